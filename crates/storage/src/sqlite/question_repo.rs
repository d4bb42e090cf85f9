use assess_core::model::{AssessmentId, Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{conn, id_to_i64, map_question_row, question_id_from_i64, ser};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_question(
        &self,
        question: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let validated = Question::new(
            QuestionId::new(0),
            question.assessment_id,
            question.skill,
            question.content,
            question.correct_answer,
            question.difficulty,
        )
        .map_err(ser)?;
        let content = serde_json::to_string(validated.content()).map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO questions (assessment_id, skill_type, content, correct_answer, difficulty_level)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(id_to_i64("assessment_id", validated.assessment_id().value())?)
        .bind(validated.skill().as_str())
        .bind(content)
        .bind(validated.correct_answer())
        .bind(i64::from(validated.difficulty()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            _ => conn(&e),
        })?;

        question_id_from_i64(res.last_insert_rowid())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, assessment_id, skill_type, content, correct_answer, difficulty_level
            FROM questions WHERE id = ?1
            ",
        )
        .bind(id_to_i64("question_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn questions_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, assessment_id, skill_type, content, correct_answer, difficulty_level
            FROM questions
            WHERE assessment_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_to_i64("assessment_id", assessment_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }
}
