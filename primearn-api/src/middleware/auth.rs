/// Bearer token authentication
///
/// Protected routes run [`require_auth`], which reads
/// `Authorization: Bearer <token>`, verifies it and injects an
/// [`AuthContext`] into the request extensions. Handlers pick it up with
/// `Extension<AuthContext>`.
///
/// | Situation | Response |
/// |---|---|
/// | No header, or empty token | 401 "Access denied. No token provided." |
/// | Bad signature, expired, wrong issuer | 400 "Invalid token" |

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use primearn_shared::auth::jwt::Claims;
use tracing::debug;
use uuid::Uuid;

/// Identity established from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub email: String,

    /// Premium flag at the time the token was issued
    pub is_premium: bool,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            email: claims.email,
            is_premium: claims.is_premium,
        }
    }
}

/// Extracts the token from an `Authorization` header value
///
/// A value without the `Bearer ` prefix is taken as the token itself.
fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// JWT authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Access denied. No token provided.".to_string()))?;

    let claims = state.accounts.verify_token(token).map_err(|e| {
        debug!(error = %e, "Rejected session token");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(req).await)
}
