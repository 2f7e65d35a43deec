/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `account`: Profile, password, community tracking, dashboard
/// - `ledger`: Task rewards, premium upgrade, withdrawals
///
/// Every success body is an [`ApiResponse`]: `{success: true, message?, ...payload}`.

pub mod account;
pub mod auth;
pub mod health;
pub mod ledger;

use serde::Serialize;

/// Success envelope with the payload flattened alongside `success`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload,
        }
    }
}

/// Payload for responses that carry only a message
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(message, Empty {})
    }
}
