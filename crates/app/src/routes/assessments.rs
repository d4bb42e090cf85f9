use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use assess_core::model::AssessmentId;

use super::dto::{
    AnswerDto, AnswerRequest, AssessmentDetailDto, AssessmentDto, CompleteRequest, ReportDto,
    ResultDto,
};
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assessments))
        .route("/:id", get(get_assessment))
        .route("/:id/start", post(start_session))
        .route("/:id/answer", post(submit_answer))
        .route("/:id/results", get(list_results).post(complete_session))
}

async fn list_assessments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssessmentDto>>, AppError> {
    let assessments = state.services().catalog().list_assessments().await?;
    Ok(Json(assessments.iter().map(AssessmentDto::from).collect()))
}

async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<AssessmentId>,
) -> Result<Json<AssessmentDetailDto>, AppError> {
    let detail = state
        .services()
        .catalog()
        .assessment_with_questions(id)
        .await?;
    Ok(Json(AssessmentDetailDto::from(&detail)))
}

async fn start_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AssessmentId>,
) -> Result<Json<ResultDto>, AppError> {
    let session = state
        .services()
        .assessments()
        .start_session(&user, id)
        .await?;
    Ok(Json(ResultDto::from(&session)))
}

async fn submit_answer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AssessmentId>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<AnswerDto>, AppError> {
    tracing::debug!(assessment_id = %id, result_id = %body.result_id, "answer submitted");
    let response = state
        .services()
        .recorder()
        .record_response(
            &user,
            body.result_id,
            body.question_id,
            &body.user_answer,
            body.time_taken,
        )
        .await?;
    Ok(Json(AnswerDto::from(response)))
}

async fn complete_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AssessmentId>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<ReportDto>, AppError> {
    let report = state
        .services()
        .assessments()
        .complete_session(&user, id, body.result_id, body.time_taken)
        .await?;
    Ok(Json(ReportDto::from(&report)))
}

async fn list_results(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AssessmentId>,
) -> Result<Json<Vec<ResultDto>>, AppError> {
    let results = state
        .services()
        .assessments()
        .list_results(&user, id)
        .await?;
    Ok(Json(results.iter().map(ResultDto::from).collect()))
}
