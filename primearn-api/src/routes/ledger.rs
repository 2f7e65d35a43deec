/// Balance-changing endpoints
///
/// All routes require a bearer token.
///
/// - `POST /api/users/complete-task` - Credit a task reward
/// - `POST /api/users/upgrade` - Upgrade to premium with a payment proof
/// - `POST /api/users/withdraw` - Request a withdrawal (premium only)

use crate::{
    app::AppState,
    error::ApiResult,
    extractors::extract_json,
    middleware::auth::AuthContext,
    routes::ApiResponse,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use primearn_shared::{
    rules::lifecycle::{TaskOutcome, UpgradeOutcome, WithdrawalOutcome},
    service::requests::{CompleteTaskRequest, UpgradeRequest, WithdrawRequest},
};

/// Complete a task
///
/// ```text
/// POST /api/users/complete-task
///
/// { "taskId": "t-17", "taskTitle": "Watch video", "reward": 100 }
/// ```
///
/// Responds with `{reward, balance, level, xp}`. Premium accounts receive
/// one and a half times the base reward.
///
/// # Errors
///
/// - `400 Bad Request`: Task already completed, blank task id, negative reward
/// - `404 Not Found`: Account no longer exists
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<TaskOutcome>>> {
    let req = extract_json(body)?;
    let outcome = state.accounts.complete_task(auth.account_id, req).await?;

    Ok(Json(ApiResponse::with_message(
        format!("Task completed! ₦{} added to your balance.", outcome.reward),
        outcome,
    )))
}

/// Upgrade to premium
///
/// ```text
/// POST /api/users/upgrade
///
/// { "transactionProof": "bank-transfer-receipt-123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing proof, or already premium
pub async fn upgrade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<UpgradeRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<UpgradeOutcome>>> {
    let req = extract_json(body)?;
    let outcome = state.accounts.upgrade(auth.account_id, req).await?;

    Ok(Json(ApiResponse::with_message(
        "🎉 Upgrade successful! You are now a Premium member.",
        outcome,
    )))
}

/// Request a withdrawal
///
/// ```text
/// POST /api/users/withdraw
///
/// { "bankName": "GTBank", "accountNumber": "0123456789", "amount": 10000 }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Account is not premium
/// - `400 Bad Request`: Below the minimum, missing bank details, insufficient balance
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<WithdrawRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<WithdrawalOutcome>>> {
    let req = extract_json(body)?;
    let outcome = state.accounts.withdraw(auth.account_id, req).await?;

    Ok(Json(ApiResponse::with_message(
        "✅ Withdrawal request submitted! Funds will be processed within 24 hours.",
        outcome,
    )))
}
