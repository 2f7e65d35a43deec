/// Account endpoints
///
/// All routes require a bearer token.
///
/// - `GET  /api/users/profile` - Profile without credentials or ledger
/// - `PUT  /api/users/profile` - Update name, phone, settings
/// - `POST /api/users/change-password`
/// - `POST /api/users/track-whatsapp-join`
/// - `GET  /api/users/dashboard` - Summary, progression stats, recent transactions

use crate::{
    app::AppState,
    error::ApiResult,
    extractors::extract_json,
    middleware::auth::AuthContext,
    routes::{ApiResponse, Empty},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use primearn_shared::{
    models::account::{ProfileView, Settings},
    rules::lifecycle::Dashboard,
    service::requests::{ChangePasswordRequest, UpdateProfileRequest},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileView,
}

/// Fields echoed back after a profile update
#[derive(Debug, Serialize)]
pub struct UpdatedProfile {
    pub name: String,
    pub phone: String,
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub user: UpdatedProfile,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let account = state.accounts.profile(auth.account_id).await?;

    Ok(Json(ApiResponse::ok(ProfileResponse {
        user: ProfileView::from(&account),
    })))
}

/// Partial update; blank name or phone leaves the stored value as is
///
/// ```text
/// PUT /api/users/profile
///
/// { "name": "Ada", "settings": { "twoFactorAuth": true } }
/// ```
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<UpdateProfileResponse>>> {
    let req = extract_json(body)?;
    let account = state.accounts.update_profile(auth.account_id, req).await?;

    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        UpdateProfileResponse {
            user: UpdatedProfile {
                name: account.name,
                phone: account.phone,
                settings: account.settings,
            },
        },
    )))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    let req = extract_json(body)?;
    state.accounts.change_password(auth.account_id, req).await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

pub async fn track_whatsapp_join(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    state.accounts.track_whatsapp_join(auth.account_id).await?;

    Ok(Json(ApiResponse::message("WhatsApp join tracked successfully")))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<DashboardResponse>>> {
    let dashboard = state.accounts.dashboard(auth.account_id).await?;

    Ok(Json(ApiResponse::ok(DashboardResponse { dashboard })))
}
