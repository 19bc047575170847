use axum::Router;

pub mod orders;
pub mod products;
pub mod system;

/// Router for the two collection surfaces.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/orders", orders::router())
}
