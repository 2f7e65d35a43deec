/// PostgreSQL plumbing: the shared pool and embedded migrations
///
/// Account queries live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
