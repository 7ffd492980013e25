use axum::{
    Router,
    routing::{get, post},
};

pub mod admin;
pub mod network;
pub mod stock;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/schools/:school_id/stock", stock::router())
        .route("/network/stock/summary", get(network::summary))
        .route(
            "/admin/stock/refresh",
            post(admin::trigger_refresh).get(admin::last_refresh),
        )
}
