//! HTTP surface of the PrimeEarn backend
//!
//! [`app::build_router`] assembles the routes in [`routes`] behind the
//! layers in [`middleware`]; [`config::Config`] is read from the
//! environment once at startup.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
