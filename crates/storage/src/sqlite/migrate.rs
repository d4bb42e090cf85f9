use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned migrations for the assessment schema.
///
/// Version 1 creates assessments, questions, assessment results (sessions),
/// user responses and their lookup indexes.
#[allow(clippy::too_many_lines)]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS assessments (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    assessment_type TEXT NOT NULL,
                    target_skills TEXT NOT NULL DEFAULT '[]',
                    difficulty_level INTEGER NOT NULL DEFAULT 1 CHECK (difficulty_level >= 1),
                    estimated_duration INTEGER CHECK (estimated_duration >= 0),
                    question_count INTEGER NOT NULL DEFAULT 0 CHECK (question_count >= 0),
                    passing_score INTEGER NOT NULL DEFAULT 70 CHECK (passing_score BETWEEN 0 AND 100),
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    id INTEGER PRIMARY KEY,
                    assessment_id INTEGER NOT NULL,
                    skill_type TEXT NOT NULL,
                    content TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    difficulty_level INTEGER NOT NULL DEFAULT 1 CHECK (difficulty_level >= 1),
                    FOREIGN KEY (assessment_id) REFERENCES assessments(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS assessment_results (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    assessment_id INTEGER NOT NULL,
                    status TEXT NOT NULL CHECK (status IN ('in_progress', 'completed')),
                    total_questions INTEGER NOT NULL DEFAULT 0 CHECK (total_questions >= 0),
                    correct_answers INTEGER NOT NULL DEFAULT 0
                        CHECK (correct_answers >= 0 AND correct_answers <= total_questions),
                    score_percentage INTEGER CHECK (score_percentage BETWEEN 0 AND 100),
                    risk_level TEXT,
                    time_taken INTEGER CHECK (time_taken >= 0),
                    started_at TEXT NOT NULL,
                    completed_at TEXT,
                    FOREIGN KEY (assessment_id) REFERENCES assessments(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS user_responses (
                    id INTEGER PRIMARY KEY,
                    result_id INTEGER NOT NULL,
                    question_id INTEGER NOT NULL,
                    user_answer TEXT NOT NULL,
                    is_correct INTEGER NOT NULL CHECK (is_correct IN (0, 1)),
                    time_taken INTEGER NOT NULL CHECK (time_taken >= 0),
                    answered_at TEXT NOT NULL,
                    UNIQUE (result_id, question_id),
                    FOREIGN KEY (result_id) REFERENCES assessment_results(id) ON DELETE CASCADE,
                    FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_assessment
                    ON questions(assessment_id, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_results_user_assessment_completed
                    ON assessment_results(user_id, assessment_id, completed_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_user_responses_result
                    ON user_responses(result_id, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
