use assess_core::model::{
    Assessment, AssessmentDraft, AssessmentId, AssessmentSession, Question, QuestionContent,
    QuestionId, Response, ResponseId, SessionId, SessionOutcome, SessionStatus, SkillType, UserId,
};
use assess_core::scoring::{FinalScore, RiskLevel};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Converts any numeric id to the `INTEGER` column representation.
pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn assessment_id_from_i64(v: i64) -> Result<AssessmentId, StorageError> {
    Ok(AssessmentId::new(i64_to_u64("assessment_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn session_id_from_i64(v: i64) -> Result<SessionId, StorageError> {
    Ok(SessionId::new(i64_to_u64("result_id", v)?))
}

pub(crate) fn response_id_from_i64(v: i64) -> Result<ResponseId, StorageError> {
    Ok(ResponseId::new(i64_to_u64("response_id", v)?))
}

pub(crate) fn map_assessment_row(row: &SqliteRow) -> Result<Assessment, StorageError> {
    let target_skills_json: String = row.try_get("target_skills").map_err(ser)?;
    let target_skills: Vec<SkillType> = serde_json::from_str(&target_skills_json).map_err(ser)?;

    let passing_score_i64: i64 = row.try_get("passing_score").map_err(ser)?;
    let passing_score = u8::try_from(passing_score_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid passing_score: {passing_score_i64}"))
    })?;

    let draft = AssessmentDraft {
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        kind: row.try_get("assessment_type").map_err(ser)?,
        target_skills,
        difficulty_level: i64_to_u32(
            "difficulty_level",
            row.try_get("difficulty_level").map_err(ser)?,
        )?,
        estimated_minutes: row
            .try_get::<Option<i64>, _>("estimated_duration")
            .map_err(ser)?
            .map(|v| i64_to_u32("estimated_duration", v))
            .transpose()?,
        question_count: i64_to_u32("question_count", row.try_get("question_count").map_err(ser)?)?,
        passing_score,
    };

    draft
        .validate(
            assessment_id_from_i64(row.try_get("id").map_err(ser)?)?,
            row.try_get("created_at").map_err(ser)?,
        )
        .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let skill_str: String = row.try_get("skill_type").map_err(ser)?;
    let skill: SkillType = skill_str.parse().map_err(ser)?;

    let content_json: String = row.try_get("content").map_err(ser)?;
    let content: QuestionContent = serde_json::from_str(&content_json).map_err(ser)?;

    Question::new(
        question_id_from_i64(row.try_get("id").map_err(ser)?)?,
        assessment_id_from_i64(row.try_get("assessment_id").map_err(ser)?)?,
        skill,
        content,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
        i64_to_u32("difficulty_level", row.try_get("difficulty_level").map_err(ser)?)?,
    )
    .map_err(ser)
}

pub(crate) fn map_session_row(row: &SqliteRow) -> Result<AssessmentSession, StorageError> {
    let status_str: String = row.try_get("status").map_err(ser)?;
    let status: SessionStatus = status_str.parse().map_err(ser)?;

    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at").map_err(ser)?;
    let score_pct: Option<i64> = row.try_get("score_percentage").map_err(ser)?;
    let risk: Option<String> = row.try_get("risk_level").map_err(ser)?;
    let time_taken: Option<i64> = row.try_get("time_taken").map_err(ser)?;

    let outcome = match (completed_at, score_pct, risk, time_taken) {
        (Some(completed_at), Some(pct), Some(risk), Some(time_taken)) => {
            let score_percentage = u8::try_from(pct)
                .map_err(|_| StorageError::Serialization(format!("invalid score_percentage: {pct}")))?;
            let risk_level: RiskLevel = risk.parse().map_err(ser)?;
            Some(SessionOutcome {
                score: FinalScore {
                    score_percentage,
                    risk_level,
                },
                time_taken_secs: i64_to_u32("time_taken", time_taken)?,
                completed_at,
            })
        }
        (None, None, None, None) => None,
        _ => {
            return Err(StorageError::Serialization(
                "partially written session outcome".into(),
            ));
        }
    };

    let user_id: String = row.try_get("user_id").map_err(ser)?;
    AssessmentSession::from_persisted(
        session_id_from_i64(row.try_get("id").map_err(ser)?)?,
        UserId::new(user_id).map_err(ser)?,
        assessment_id_from_i64(row.try_get("assessment_id").map_err(ser)?)?,
        status,
        i64_to_u32("total_questions", row.try_get("total_questions").map_err(ser)?)?,
        i64_to_u32("correct_answers", row.try_get("correct_answers").map_err(ser)?)?,
        started_at,
        outcome,
    )
    .map_err(ser)
}

pub(crate) fn map_response_row(row: &SqliteRow) -> Result<Response, StorageError> {
    Ok(Response {
        id: response_id_from_i64(row.try_get("id").map_err(ser)?)?,
        session_id: session_id_from_i64(row.try_get("result_id").map_err(ser)?)?,
        question_id: question_id_from_i64(row.try_get("question_id").map_err(ser)?)?,
        submitted_answer: row.try_get("user_answer").map_err(ser)?,
        is_correct: row.try_get::<i64, _>("is_correct").map_err(ser)? != 0,
        elapsed_secs: i64_to_u32("time_taken", row.try_get("time_taken").map_err(ser)?)?,
        answered_at: row.try_get("answered_at").map_err(ser)?,
    })
}
