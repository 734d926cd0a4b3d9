use axum::{routing::get, Router};

use crate::http::handlers;
use crate::AppState;

pub fn info() -> Router<AppState> {
    Router::new().route("/", get(handlers::service_info))
}

pub fn cache() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/set", get(handlers::set_key))
        .route("/get", get(handlers::get_key))
}
