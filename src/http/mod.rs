use axum::Router;

use crate::AppState;

mod error;
mod handlers;
mod routes;

pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::info())
        .merge(routes::cache())
        .with_state(state)
}
