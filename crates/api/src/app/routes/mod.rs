use axum::Router;

pub mod stock;
pub mod system;

/// Router for all farm-scoped endpoints.
pub fn router() -> Router {
    Router::new().nest("/farms/:farm_id/stock", stock::router())
}
