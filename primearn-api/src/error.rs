/// Failure envelope
///
/// Handlers return [`ApiResult`]; an [`ApiError`] renders as
///
/// ```json
/// { "success": false, "message": "Insufficient balance" }
/// ```
///
/// Validation failures add `errors: [{field, message}]`. Internal failures
/// always answer "Something went wrong!"; the underlying detail is attached
/// to the response as an [`InternalErrorDetail`] extension and only written
/// into the body by [`crate::middleware::errors::expose_error_detail`] when
/// debug mode is on.
///
/// # Example
///
/// ```
/// use primearn_api::error::{ApiError, ApiResult};
///
/// async fn lookup() -> ApiResult<()> {
///     Err(ApiError::NotFound("User not found".to_string()))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use primearn_shared::auth::jwt::JwtError;
use primearn_shared::rules::error::{FieldError, RuleError};
use primearn_shared::store::StoreError;
use serde::Serialize;
use std::any::Any;
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message used for every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): conflicts, bad credentials, insufficient funds,
    /// invalid tokens and malformed bodies
    BadRequest(String),

    /// Bad request (400) with per-field details
    ValidationError {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Unauthorized (401): no token supplied
    Unauthorized(String),

    /// 403: inactive account, premium-only operation
    Forbidden(String),

    NotFound(String),

    /// 500; the message is logged and never sent unless debug is on
    InternalError(String),
}

/// `{ success: false, message, errors?, error? }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,

    /// Internal detail (debug mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            error: None,
        }
    }
}

/// Detail of an internal failure, carried as a response extension
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError { message, errors } => {
                write!(f, "Validation failed: {} ({} errors)", message, errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::ValidationError { message, errors } => {
                let mut body = ErrorResponse::new(message);
                if !errors.is_empty() {
                    body.errors = Some(errors);
                }
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::new(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ApiError::InternalError(msg) => return internal_error_response(msg),
        };

        (status, Json(body)).into_response()
    }
}

/// Builds the generic 500 envelope, keeping the detail as an extension
pub fn internal_error_response(detail: String) -> Response {
    // Log internal errors but don't expose details to clients
    tracing::error!(detail = %detail, "Internal error");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response();
    response.extensions_mut().insert(InternalErrorDetail(detail));
    response
}

/// Converts a caught handler panic into the 500 envelope
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    internal_error_response(detail)
}

/// Convert account rule errors to API errors
impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::Validation { message, errors } => {
                ApiError::ValidationError { message, errors }
            }
            RuleError::Conflict(msg) | RuleError::Auth(msg) | RuleError::InsufficientFunds(msg) => {
                ApiError::BadRequest(msg)
            }
            RuleError::Forbidden(msg) => ApiError::Forbidden(msg),
            RuleError::NotFound(msg) => ApiError::NotFound(msg),
            RuleError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        RuleError::from(err).into()
    }
}

/// Convert JWT errors to API errors
///
/// Any verification failure (bad signature, expiry, wrong issuer) is a 400.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::BadRequest("Invalid token".to_string()),
        }
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
