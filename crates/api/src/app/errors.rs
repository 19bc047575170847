use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    // No retry, no fallback: the store being unreachable is the caller's
    // signal to try again later.
    tracing::error!("store operation failed: {err}");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        err.to_string(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
