/// Request body extraction
///
/// Handlers take `Result<Json<T>, JsonRejection>` and unwrap it with
/// [`extract_json`], so malformed bodies answer with the standard error
/// envelope instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> ApiResult<...> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Extract a JSON body, mapping deserialization errors to [`ApiError::BadRequest`]
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result.map(|Json(v)| v).map_err(ApiError::from)
}
