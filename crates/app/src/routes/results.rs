use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use assess_core::model::SessionId;

use super::dto::ReportDto;
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(get_report))
}

/// Rebuild the report of a completed result.
async fn get_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<SessionId>,
) -> Result<Json<ReportDto>, AppError> {
    let report = state
        .services()
        .assessments()
        .session_report(&user, id)
        .await?;
    Ok(Json(ReportDto::from(&report)))
}
