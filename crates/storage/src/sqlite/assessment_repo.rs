use assess_core::model::{Assessment, AssessmentDraft, AssessmentId};
use chrono::{DateTime, Utc};

use super::SqliteRepository;
use super::mapping::{assessment_id_from_i64, conn, id_to_i64, map_assessment_row, ser};
use crate::repository::{AssessmentRepository, StorageError};

#[async_trait::async_trait]
impl AssessmentRepository for SqliteRepository {
    async fn insert_assessment(
        &self,
        draft: AssessmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<AssessmentId, StorageError> {
        // Validate with a placeholder id; the row id is assigned on insert.
        let assessment = draft.validate(AssessmentId::new(0), created_at).map_err(ser)?;
        let target_skills = serde_json::to_string(assessment.target_skills()).map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO assessments (
                title, description, assessment_type, target_skills, difficulty_level,
                estimated_duration, question_count, passing_score, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(assessment.title())
        .bind(assessment.description())
        .bind(assessment.kind())
        .bind(target_skills)
        .bind(i64::from(assessment.difficulty_level()))
        .bind(assessment.estimated_minutes().map(i64::from))
        .bind(i64::from(assessment.question_count()))
        .bind(i64::from(assessment.passing_score()))
        .bind(assessment.created_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        assessment_id_from_i64(res.last_insert_rowid())
    }

    async fn get_assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, assessment_type, target_skills, difficulty_level,
                   estimated_duration, question_count, passing_score, created_at
            FROM assessments WHERE id = ?1
            ",
        )
        .bind(id_to_i64("assessment_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_assessment_row).transpose()
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, assessment_type, target_skills, difficulty_level,
                   estimated_duration, question_count, passing_score, created_at
            FROM assessments
            ORDER BY difficulty_level ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_assessment_row).collect()
    }
}
