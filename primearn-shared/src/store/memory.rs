/// In-memory account store
///
/// Keeps accounts in a `HashMap` behind a `tokio::sync::RwLock`. Records are
/// cloned in and out so callers never share mutable state with the store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::account::Account;

/// Process-local account store
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|existing| existing.email == account.email) {
            return Err(StoreError::DuplicateEmail(account.email.clone()));
        }

        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|existing| existing.id != account.id && existing.email == account.email)
        {
            return Err(StoreError::DuplicateEmail(account.email.clone()));
        }

        match accounts.get_mut(&account.id) {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(account.id)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{config::RulesConfig, lifecycle::NewAccount};
    use chrono::Utc;

    fn account(email: &str) -> Account {
        Account::register(
            NewAccount {
                name: "Test User".to_string(),
                email: email.to_string(),
                phone: "0800".to_string(),
                password_hash: "hash".to_string(),
                referral_code: "EARN800".to_string(),
            },
            &RulesConfig::default(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryAccountStore::new();
        let account = account("ada@example.com");
        store.insert(&account).await.unwrap();

        let by_id = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(by_id, account);

        let by_email = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_email() {
        let store = MemoryAccountStore::new();
        store.insert(&account("ada@example.com")).await.unwrap();

        let err = store.insert(&account("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_full_record() {
        let store = MemoryAccountStore::new();
        let mut account = account("ada@example.com");
        store.insert(&account).await.unwrap();

        account.balance = 12_345;
        store.save(&account).await.unwrap();

        let loaded = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(loaded.balance, 12_345);
    }

    #[tokio::test]
    async fn test_save_unknown_account() {
        let store = MemoryAccountStore::new();
        let err = store.save(&account("ghost@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryAccountStore::new();
        let account = account("ada@example.com");
        store.insert(&account).await.unwrap();

        let mut first = store.find_by_id(account.id).await.unwrap().unwrap();
        let mut second = store.find_by_id(account.id).await.unwrap().unwrap();

        first.balance += 100;
        second.balance += 200;
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        let loaded = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(loaded.balance, account.balance + 200);
    }
}
