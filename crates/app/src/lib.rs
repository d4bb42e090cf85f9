#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod state;

use axum::Router;
use services::{AppServices, Clock};
use storage::repository::Storage;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{AppError, StartupError};
pub use state::AppState;

/// Build the full HTTP application over the given services.
pub fn create_app(services: AppServices) -> Router {
    routes::router(AppState::new(services)).layer(TraceLayer::new_for_http())
}

/// Open storage, optionally seed it, and wire the services.
///
/// # Errors
///
/// Returns `StartupError` if the database cannot be opened or seeded.
pub async fn build_services(config: &Config, clock: Clock) -> Result<AppServices, StartupError> {
    let storage = Storage::sqlite(&config.database_url)
        .await
        .map_err(services::AppServicesError::from)?;

    if config.seed_on_empty && storage.assessments.list_assessments().await?.is_empty() {
        let id = storage::seed::seed_screening(&storage, clock.now()).await?;
        tracing::info!(assessment_id = %id, "seeded empty database");
    }

    Ok(AppServices::from_storage(&storage, clock))
}
