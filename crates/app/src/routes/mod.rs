mod assessments;
pub mod dto;
mod health;
mod results;

use axum::Router;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/assessments", assessments::router())
        .nest("/api/results", results::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("Route not found").into_response()
}
