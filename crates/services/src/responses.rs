use std::sync::Arc;

use assess_core::model::{NewResponse, QuestionId, Response, SessionId, UserId};
use assess_core::time::Clock;
use storage::repository::{QuestionRepository, SessionRepository, StorageError};

use crate::access::load_owned_session;
use crate::error::AssessmentError;

/// Scores submitted answers and records them against an in-progress session.
#[derive(Clone)]
pub struct ResponseRecorder {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl ResponseRecorder {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn SessionRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            clock,
            sessions,
            questions,
        }
    }

    /// Score one answer and persist it, bumping the session's running totals.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` / `QuestionNotFound` for unknown ids, or a question
    ///   from a different assessment than the session.
    /// - `NotOwner` if `user` does not own the session.
    /// - `Completed` if the session is finished, including one finished while
    ///   this call was in flight.
    /// - `DuplicateResponse` if the question was already answered.
    pub async fn record_response(
        &self,
        user: &UserId,
        session_id: SessionId,
        question_id: QuestionId,
        submitted_answer: &str,
        elapsed_secs: u32,
    ) -> Result<Response, AssessmentError> {
        let session = load_owned_session(self.sessions.as_ref(), user, session_id).await?;
        if session.is_completed() {
            tracing::warn!(%session_id, "answer submitted to completed session");
            return Err(AssessmentError::Completed);
        }

        let question = self
            .questions
            .get_question(question_id)
            .await?
            .filter(|q| q.assessment_id() == session.assessment_id())
            .ok_or(AssessmentError::QuestionNotFound(question_id))?;

        let is_correct = question.is_correct(submitted_answer);
        let pending = NewResponse {
            session_id,
            question_id,
            submitted_answer: submitted_answer.to_owned(),
            is_correct,
            elapsed_secs,
            answered_at: self.clock.now(),
        };

        match self.sessions.record_response(pending).await {
            Ok(response) => {
                tracing::debug!(
                    %session_id,
                    %question_id,
                    is_correct,
                    elapsed_secs,
                    "recorded response"
                );
                Ok(response)
            }
            Err(StorageError::Conflict) => {
                tracing::warn!(%session_id, "session completed before answer was stored");
                Err(AssessmentError::Completed)
            }
            Err(StorageError::AlreadyExists) => {
                tracing::warn!(%session_id, %question_id, "duplicate answer rejected");
                Err(AssessmentError::DuplicateResponse)
            }
            Err(StorageError::NotFound) => Err(AssessmentError::SessionNotFound(session_id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{AssessmentDraft, AssessmentId, QuestionContent, SkillType};
    use assess_core::time::{fixed_clock, fixed_now};
    use storage::repository::{NewQuestionRecord, NewSessionRecord, Storage};
    use storage::seed::seed_screening;

    struct Fixture {
        storage: Storage,
        recorder: ResponseRecorder,
        assessment_id: AssessmentId,
        questions: Vec<QuestionId>,
        session_id: SessionId,
        user: UserId,
    }

    async fn fixture() -> Fixture {
        let storage = Storage::in_memory();
        let assessment_id = seed_screening(&storage, fixed_now()).await.unwrap();
        let questions = storage
            .questions
            .questions_for_assessment(assessment_id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id())
            .collect();
        let user = UserId::new("reader").unwrap();
        let session_id = storage
            .sessions
            .insert_session(NewSessionRecord {
                user_id: user.clone(),
                assessment_id,
                started_at: fixed_now(),
            })
            .await
            .unwrap();
        let recorder = ResponseRecorder::new(
            fixed_clock(),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.questions),
        );
        Fixture {
            storage,
            recorder,
            assessment_id,
            questions,
            session_id,
            user,
        }
    }

    #[tokio::test]
    async fn normalizes_answers_and_bumps_totals() {
        let f = fixture().await;
        let first = f
            .recorder
            .record_response(&f.user, f.session_id, f.questions[0], "  THE ", 3)
            .await
            .unwrap();
        assert!(first.is_correct);
        assert_eq!(first.submitted_answer, "  THE ");

        let second = f
            .recorder
            .record_response(&f.user, f.session_id, f.questions[1], "an", 5)
            .await
            .unwrap();
        assert!(!second.is_correct);

        let session = f
            .storage
            .sessions
            .get_session(f.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.total_questions(), 2);
        assert_eq!(session.correct_answers(), 1);
    }

    #[tokio::test]
    async fn rejects_other_users() {
        let f = fixture().await;
        let stranger = UserId::new("someone-else").unwrap();
        let err = f
            .recorder
            .record_response(&stranger, f.session_id, f.questions[0], "the", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::NotOwner(_)));
    }

    #[tokio::test]
    async fn rejects_duplicates() {
        let f = fixture().await;
        f.recorder
            .record_response(&f.user, f.session_id, f.questions[0], "the", 1)
            .await
            .unwrap();
        let err = f
            .recorder
            .record_response(&f.user, f.session_id, f.questions[0], "a", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::DuplicateResponse));
    }

    #[tokio::test]
    async fn questions_from_other_assessments_are_not_found() {
        let f = fixture().await;
        let other = f
            .storage
            .assessments
            .insert_assessment(AssessmentDraft::new("Rhymes", "practice"), fixed_now())
            .await
            .unwrap();
        let foreign = f
            .storage
            .questions
            .insert_question(NewQuestionRecord {
                assessment_id: other,
                skill: SkillType::Rhyme,
                content: QuestionContent::with_choices("Which rhymes with cat?", ["hat", "dog"]),
                correct_answer: "hat".into(),
                difficulty: 1,
            })
            .await
            .unwrap();
        assert_ne!(other, f.assessment_id);

        let err = f
            .recorder
            .record_response(&f.user, f.session_id, foreign, "hat", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::QuestionNotFound(id) if id == foreign));

        let err = f
            .recorder
            .record_response(&f.user, SessionId::new(9_999), f.questions[0], "the", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::SessionNotFound(_)));
    }
}
