use assess_core::model::{AssessmentId, AssessmentSession, NewResponse, Response, SessionId, UserId};
use super::SqliteRepository;
use super::mapping::{conn, id_to_i64, map_session_row, response_id_from_i64, session_id_from_i64};
use crate::repository::{CompletionRecord, NewSessionRecord, SessionRepository, StorageError};

const SESSION_COLUMNS: &str = r"
    SELECT id, user_id, assessment_id, status, total_questions, correct_answers,
           score_percentage, risk_level, time_taken, started_at, completed_at
    FROM assessment_results
";

impl SqliteRepository {
    /// Distinguish a missing session from one that failed a conditional write.
    async fn conflict_or_missing<'e, E>(executor: E, id: i64) -> StorageError
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        match sqlx::query("SELECT 1 FROM assessment_results WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await
        {
            Ok(Some(_)) => StorageError::Conflict,
            Ok(None) => StorageError::NotFound,
            Err(e) => conn(e),
        }
    }
}

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn insert_session(&self, session: NewSessionRecord) -> Result<SessionId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO assessment_results (user_id, assessment_id, status, total_questions, correct_answers, started_at)
            VALUES (?1, ?2, 'in_progress', 0, 0, ?3)
            ",
        )
        .bind(session.user_id.as_str())
        .bind(id_to_i64("assessment_id", session.assessment_id.value())?)
        .bind(session.started_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            _ => conn(&e),
        })?;

        session_id_from_i64(res.last_insert_rowid())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<AssessmentSession>, StorageError> {
        let row = sqlx::query(&format!("{SESSION_COLUMNS} WHERE id = ?1"))
            .bind(id_to_i64("result_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn sessions_for_user(
        &self,
        user_id: &UserId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<AssessmentSession>, StorageError> {
        let rows = sqlx::query(&format!(
            "{SESSION_COLUMNS}
            WHERE user_id = ?1 AND assessment_id = ?2
            ORDER BY completed_at IS NULL, completed_at ASC, id ASC"
        ))
        .bind(user_id.as_str())
        .bind(id_to_i64("assessment_id", assessment_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_session_row).collect()
    }

    async fn record_response(&self, response: NewResponse) -> Result<Response, StorageError> {
        let session_id = id_to_i64("result_id", response.session_id.value())?;
        let question_id = id_to_i64("question_id", response.question_id.value())?;

        let mut tx = self.pool.begin().await.map_err(conn)?;

        let bumped = sqlx::query(
            r"
            UPDATE assessment_results
            SET total_questions = total_questions + 1,
                correct_answers = correct_answers + ?1
            WHERE id = ?2 AND status = 'in_progress'
            ",
        )
        .bind(i64::from(response.is_correct))
        .bind(session_id)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if bumped.rows_affected() == 0 {
            let err = Self::conflict_or_missing(&mut *tx, session_id).await;
            tx.rollback().await.map_err(conn)?;
            return Err(err);
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO user_responses (result_id, question_id, user_answer, is_correct, time_taken, answered_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(session_id)
        .bind(question_id)
        .bind(response.submitted_answer.as_str())
        .bind(i64::from(response.is_correct))
        .bind(i64::from(response.elapsed_secs))
        .bind(response.answered_at)
        .execute(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(res) => res,
            Err(e) => {
                let mapped = match e.as_database_error() {
                    Some(db) if db.is_unique_violation() => StorageError::AlreadyExists,
                    Some(db) if db.is_foreign_key_violation() => StorageError::NotFound,
                    _ => conn(&e),
                };
                tx.rollback().await.map_err(conn)?;
                return Err(mapped);
            }
        };

        let id = response_id_from_i64(inserted.last_insert_rowid())?;
        tx.commit().await.map_err(conn)?;
        Ok(response.with_id(id))
    }

    async fn complete_session(
        &self,
        completion: CompletionRecord,
    ) -> Result<AssessmentSession, StorageError> {
        let session_id = id_to_i64("result_id", completion.session_id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let updated = sqlx::query(
            r"
            UPDATE assessment_results
            SET status = 'completed',
                score_percentage = ?1,
                risk_level = ?2,
                time_taken = ?3,
                completed_at = ?4
            WHERE id = ?5
              AND status = 'in_progress'
              AND total_questions = ?6
              AND correct_answers = ?7
            ",
        )
        .bind(i64::from(completion.score.score_percentage))
        .bind(completion.score.risk_level.as_str())
        .bind(i64::from(completion.time_taken_secs))
        .bind(completion.completed_at)
        .bind(session_id)
        .bind(i64::from(completion.expected_total))
        .bind(i64::from(completion.expected_correct))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if updated.rows_affected() == 0 {
            let err = Self::conflict_or_missing(&mut *tx, session_id).await;
            tx.rollback().await.map_err(conn)?;
            return Err(err);
        }

        let row = sqlx::query(&format!("{SESSION_COLUMNS} WHERE id = ?1"))
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(conn)?;
        let session = map_session_row(&row)?;
        tx.commit().await.map_err(conn)?;
        Ok(session)
    }
}
