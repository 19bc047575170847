use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_orders::NewOrder;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/:user_id", get(get_user_orders))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewOrder>,
) -> axum::response::Response {
    // Product references and quantities are not checked at write time;
    // unmatched references surface later as inner-join drops.
    match services.create_order(body).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_user_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
    Query(query): Query<dto::UserOrdersQuery>,
) -> axum::response::Response {
    let window = query.window();
    if let Err(e) = window.validate() {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_limit", e.to_string());
    }

    match services.user_orders(&user_id, window).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
