use std::sync::Arc;

use assess_core::model::{AssessmentSession, SessionId, UserId};
use assess_core::scoring::FinalScore;
use assess_core::time::Clock;
use storage::repository::{CompletionRecord, SessionRepository, StorageError};

use crate::access::load_owned_session;
use crate::error::AssessmentError;

/// Finalizes sessions: computes the score from the running totals and writes
/// the terminal fields exactly once.
#[derive(Clone)]
pub struct ScoringService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
}

impl ScoringService {
    #[must_use]
    pub fn new(clock: Clock, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { clock, sessions }
    }

    /// Finalize a session and return its score.
    ///
    /// # Errors
    ///
    /// See [`ScoringService::finalize`].
    pub async fn finalize_session(
        &self,
        user: &UserId,
        session_id: SessionId,
        time_taken_secs: u32,
    ) -> Result<FinalScore, AssessmentError> {
        let session = self.finalize(user, session_id, time_taken_secs).await?;
        Ok(session
            .outcome()
            .map_or_else(|| session.current_score(), |o| o.score))
    }

    /// Finalize a session and return it in its completed form.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist.
    /// - `NotOwner` if `user` does not own it.
    /// - `Completed` if it was already finalized, including by a concurrent call.
    /// - `Storage(Conflict)` if an answer landed after the totals were read.
    pub async fn finalize(
        &self,
        user: &UserId,
        session_id: SessionId,
        time_taken_secs: u32,
    ) -> Result<AssessmentSession, AssessmentError> {
        let session = load_owned_session(self.sessions.as_ref(), user, session_id).await?;
        if session.is_completed() {
            tracing::warn!(%session_id, "session finalized twice");
            return Err(AssessmentError::Completed);
        }

        let completed_at = self.clock.now();
        let mut preview = session.clone();
        let score = preview
            .complete(time_taken_secs, completed_at)
            .map_err(assess_core::Error::from)?;

        let record = CompletionRecord {
            session_id,
            expected_total: session.total_questions(),
            expected_correct: session.correct_answers(),
            score,
            time_taken_secs,
            completed_at,
        };

        match self.sessions.complete_session(record).await {
            Ok(completed) => {
                tracing::info!(
                    %session_id,
                    score = score.score_percentage,
                    risk = %score.risk_level,
                    total = record.expected_total,
                    correct = record.expected_correct,
                    "session completed"
                );
                Ok(completed)
            }
            Err(StorageError::Conflict) => {
                let latest = self.sessions.get_session(session_id).await?;
                if latest.is_some_and(|s| s.is_completed()) {
                    tracing::warn!(%session_id, "session finalized concurrently");
                    Err(AssessmentError::Completed)
                } else {
                    tracing::warn!(%session_id, "session totals changed during finalize");
                    Err(StorageError::Conflict.into())
                }
            }
            Err(StorageError::NotFound) => Err(AssessmentError::SessionNotFound(session_id)),
            Err(e) => Err(e.into()),
        }
    }
}
