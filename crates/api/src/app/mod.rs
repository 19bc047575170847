//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store selection and the composite read paths
//! - `routes/`: HTTP routes + handlers (one file per collection)
//! - `dto.rs`: query-string DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router against the environment-selected store
/// (public entrypoint used by `main.rs`).
pub async fn build_app() -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services().await?);
    Ok(build_router(services))
}

/// Build the router against explicit services (tests inject an in-memory
/// store here).
pub fn build_router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
}
