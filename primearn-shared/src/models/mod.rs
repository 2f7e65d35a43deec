/// Domain models for PrimeEarn
///
/// # Models
///
/// - `account`: The account aggregate (identity, ledger, progression,
///   membership, settings) and its client-facing projections
///
/// # Example
///
/// ```no_run
/// use primearn_shared::models::account::{Account, ProfileView};
///
/// fn render(account: &Account) -> serde_json::Value {
///     serde_json::to_value(ProfileView::from(account)).unwrap()
/// }
/// ```

pub mod account;
