/// Debug-mode error detail
///
/// 500 responses carry their underlying cause as an
/// [`InternalErrorDetail`] extension. When the server runs with
/// `APP_DEBUG=true` this middleware rewrites the body to include it under
/// `error`; otherwise the generic envelope goes out unchanged.

use crate::{
    app::AppState,
    error::{ErrorResponse, InternalErrorDetail, INTERNAL_ERROR_MESSAGE},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

pub async fn expose_error_detail(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if !state.config.api.debug {
        return response;
    }

    let Some(InternalErrorDetail(detail)) = response.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return response;
    };

    let mut body = ErrorResponse::new(INTERNAL_ERROR_MESSAGE);
    body.error = Some(detail);

    (response.status(), Json(body)).into_response()
}
