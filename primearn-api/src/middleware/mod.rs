/// Request and response middleware
///
/// - [`auth`]: bearer token check for account routes
/// - [`errors`]: internal error detail in debug mode
/// - [`security`]: hardening headers

pub mod auth;
pub mod errors;
pub mod security;
