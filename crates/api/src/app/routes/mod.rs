use axum::{Router, routing::get};

pub mod products;
pub mod system;

/// Router for every endpoint under `/api`.
pub fn router() -> Router {
    products::router()
}

pub fn health_router() -> Router {
    Router::new().route("/health", get(system::health))
}
