use assess_core::model::{Response, SessionId, SkillType};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, id_to_i64, map_response_row, ser};
use crate::repository::{ResponseRepository, ScoredResponse, StorageError};

#[async_trait::async_trait]
impl ResponseRepository for SqliteRepository {
    async fn responses_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Response>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, result_id, question_id, user_answer, is_correct, time_taken, answered_at
            FROM user_responses
            WHERE result_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_to_i64("result_id", session_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_response_row).collect()
    }

    async fn responses_with_skills(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ScoredResponse>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.result_id, r.question_id, r.user_answer, r.is_correct,
                   r.time_taken, r.answered_at, q.skill_type
            FROM user_responses r
            JOIN questions q ON q.id = r.question_id
            WHERE r.result_id = ?1
            ORDER BY r.id ASC
            ",
        )
        .bind(id_to_i64("result_id", session_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| {
                let skill: SkillType = row
                    .try_get::<String, _>("skill_type")
                    .map_err(ser)?
                    .parse()
                    .map_err(ser)?;
                Ok(ScoredResponse {
                    response: map_response_row(row)?,
                    skill,
                })
            })
            .collect()
    }
}
