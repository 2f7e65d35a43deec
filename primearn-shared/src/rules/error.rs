/// Business-rule error taxonomy
///
/// Every account operation fails with one of these variants. The API layer
/// maps them onto HTTP status codes; nothing in this crate knows about HTTP.

use serde::{Deserialize, Serialize};

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::store::StoreError;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error type for account operations
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Malformed or missing input
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Duplicate email, duplicate task completion, already premium
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials
    #[error("{0}")]
    Auth(String),

    /// Inactive account, non-premium withdrawal
    #[error("{0}")]
    Forbidden(String),

    /// Unknown account
    #[error("{0}")]
    NotFound(String),

    /// Balance below the requested withdrawal
    #[error("{0}")]
    InsufficientFunds(String),

    /// Anything unexpected (storage, hashing, signing)
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RuleResult<T> = Result<T, RuleError>;

impl RuleError {
    /// Validation error without field details
    pub fn invalid(message: impl Into<String>) -> Self {
        RuleError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Validation error for a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        RuleError::Validation {
            message: message.clone(),
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn account_not_found() -> Self {
        RuleError::NotFound("User not found".to_string())
    }
}

/// Collects `validator` failures into field details
impl From<validator::ValidationErrors> for RuleError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    FieldError::new(
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    )
                })
            })
            .collect();
        // HashMap iteration order is not stable
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = details
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "Validation failed".to_string());

        RuleError::Validation {
            message,
            errors: details,
        }
    }
}

impl From<StoreError> for RuleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => {
                RuleError::Conflict("Email already registered. Please login instead.".to_string())
            }
            StoreError::NotFound(_) => RuleError::account_not_found(),
            other => RuleError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for RuleError {
    fn from(err: PasswordError) -> Self {
        RuleError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for RuleError {
    fn from(err: JwtError) -> Self {
        RuleError::Internal(format!("Token operation failed: {}", err))
    }
}
