/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /api/users/register` - Register new user
/// - `POST /api/users/login` - Login and get a session token

use crate::{
    app::AppState,
    error::ApiResult,
    extractors::extract_json,
    routes::ApiResponse,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use primearn_shared::{
    models::account::Account,
    service::{
        requests::{LoginRequest, RegisterRequest},
        Session,
    },
};
use serde::Serialize;
use uuid::Uuid;

/// Account summary returned with a session token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub balance: i64,
    pub is_premium: bool,
    pub level: u32,
    pub streak: u32,
    pub tasks_completed: u32,
    pub total_earned: i64,
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            balance: account.balance,
            is_premium: account.is_premium(),
            level: account.level,
            streak: account.streak,
            tasks_completed: account.tasks_completed,
            total_earned: account.total_earned,
        }
    }
}

/// Register and login response payload
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    pub user: SessionUser,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: SessionUser::from(&session.account),
            token: session.token,
        }
    }
}

/// Register a new user
///
/// Creates the account with the welcome bonus already credited and signs
/// the user in.
///
/// # Endpoint
///
/// ```text
/// POST /api/users/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Obi",
///   "email": "ada@example.com",
///   "phone": "08030000000",
///   "password": "secret1",
///   "referralCode": "EARN800"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "message": "Registration successful! Welcome bonus ₦800 added.",
///   "token": "eyJ...",
///   "user": { "id": "uuid", "name": "Ada Obi", "balance": 800, ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, unknown referral code, or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SessionResponse>>)> {
    let req = extract_json(body)?;
    let session = state.accounts.register(req).await?;

    let message = format!(
        "Registration successful! Welcome bonus ₦{} added.",
        state.accounts.rules().welcome_bonus
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, session.into())),
    ))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/users/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email or password
/// - `403 Forbidden`: Account deactivated
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let req = extract_json(body)?;
    let session = state.accounts.login(req).await?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        session.into(),
    )))
}
