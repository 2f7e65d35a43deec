/// Account storage
///
/// The account store persists whole [`Account`] records. Every mutating
/// operation loads a record, applies a transition and saves the full record
/// back; the store is the sole arbiter of single-record atomicity and there
/// is no cross-record transaction. Concurrent saves of the same account are
/// last-write-wins.
///
/// # Implementations
///
/// - [`postgres::PgAccountStore`]: one JSONB document per account in PostgreSQL
/// - [`memory::MemoryAccountStore`]: process-local map, for tests and local runs
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use primearn_shared::store::{AccountStore, memory::MemoryAccountStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
/// let missing = store.find_by_id(Uuid::new_v4()).await?;
/// assert!(missing.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::account::Account;

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another account already uses this email
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Saved an account that does not exist
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable keyed storage for accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Stores a new account
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    /// Looks up an account by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Looks up an account by its normalized (lowercase) email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Overwrites an existing account with the given full record
    async fn save(&self, account: &Account) -> Result<(), StoreError>;

    /// Checks that the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
