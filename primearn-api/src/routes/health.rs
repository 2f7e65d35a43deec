/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - The account store is reachable
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "timestamp": "2025-12-10T09:00:00Z",
///   "uptime": 12.5,
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "OK" when the store answers, "DEGRADED" otherwise
    pub status: &'static str,

    pub timestamp: DateTime<Utc>,

    /// Seconds since the server started
    pub uptime: f64,

    /// Application version
    pub version: &'static str,

    /// Account store status
    pub database: &'static str,
}

/// Health check handler
///
/// Always answers 200; a failed store probe is reported in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.accounts.store().ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Account store health check failed");
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: if database == "connected" { "OK" } else { "DEGRADED" },
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
