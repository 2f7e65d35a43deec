//! # PrimeEarn Shared Library
//!
//! Domain types, rules and persistence used by the PrimeEarn API server.
//!
//! ## Module Organization
//!
//! - `models`: Account record and its embedded collections
//! - `rules`: Progression engine and account lifecycle transitions
//! - `store`: Account store trait with PostgreSQL and in-memory backends
//! - `service`: Account operations (load, transition, save)
//! - `auth`: Password hashing and session tokens
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod rules;
pub mod service;
pub mod store;

/// Current version of the PrimeEarn shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
