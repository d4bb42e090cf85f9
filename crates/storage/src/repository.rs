use async_trait::async_trait;
use assess_core::model::{
    Assessment, AssessmentDraft, AssessmentId, AssessmentSession, NewResponse, Question,
    QuestionContent, QuestionId, Response, ResponseId, SessionId, SessionStateError, SkillType,
    UserId,
};
use assess_core::scoring::FinalScore;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    /// A conditional write did not apply (session no longer in the expected state).
    #[error("conflict")]
    Conflict,

    #[error("already exists")]
    AlreadyExists,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Insert shape for a question; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestionRecord {
    pub assessment_id: AssessmentId,
    pub skill: SkillType,
    pub content: QuestionContent,
    pub correct_answer: String,
    pub difficulty: u32,
}

/// Insert shape for a session; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionRecord {
    pub user_id: UserId,
    pub assessment_id: AssessmentId,
    pub started_at: DateTime<Utc>,
}

/// Terminal write for a session.
///
/// `expected_total` / `expected_correct` are the totals the score was computed
/// from; the write only applies if the stored totals still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRecord {
    pub session_id: SessionId,
    pub expected_total: u32,
    pub expected_correct: u32,
    pub score: FinalScore,
    pub time_taken_secs: u32,
    pub completed_at: DateTime<Utc>,
}

/// A response paired with the skill type of the question it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredResponse {
    pub response: Response,
    pub skill: SkillType,
}

//
// ─── TRAITS ────────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Insert a new assessment and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the assessment cannot be stored.
    async fn insert_assessment(
        &self,
        draft: AssessmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<AssessmentId, StorageError>;

    /// Fetch an assessment by id, `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, StorageError>;

    /// All assessments ordered by difficulty level, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_assessments(&self) -> Result<Vec<Assessment>, StorageError>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question into the bank and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the assessment is missing.
    async fn insert_question(&self, question: NewQuestionRecord)
    -> Result<QuestionId, StorageError>;

    /// Fetch a question by id, `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// Questions of one assessment ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn questions_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Question>, StorageError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create an in-progress session with zeroed totals.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the assessment is missing.
    async fn insert_session(&self, session: NewSessionRecord) -> Result<SessionId, StorageError>;

    /// Fetch a session by id, `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_session(&self, id: SessionId) -> Result<Option<AssessmentSession>, StorageError>;

    /// Sessions of one user for one assessment, ordered by completion time
    /// (in-progress sessions last), then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn sessions_for_user(
        &self,
        user_id: &UserId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<AssessmentSession>, StorageError>;

    /// Persist a response and bump the session totals as one atomic step.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is missing.
    /// - `Conflict` if the session is no longer in progress.
    /// - `AlreadyExists` if the question was already answered in this session.
    async fn record_response(&self, response: NewResponse) -> Result<Response, StorageError>;

    /// Write the final score and mark the session completed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is missing.
    /// - `Conflict` if the session is not in progress or its totals changed.
    async fn complete_session(
        &self,
        completion: CompletionRecord,
    ) -> Result<AssessmentSession, StorageError>;
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Responses of a session in submission order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn responses_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Response>, StorageError>;

    /// Responses of a session joined with their question's skill type.
    ///
    /// Responses whose question no longer exists are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn responses_with_skills(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ScoredResponse>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    assessments: HashMap<AssessmentId, Assessment>,
    questions: HashMap<QuestionId, Question>,
    sessions: HashMap<SessionId, AssessmentSession>,
    responses: Vec<Response>,
    answered: HashSet<(SessionId, QuestionId)>,
    next_id: u64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn session_error(err: SessionStateError) -> StorageError {
    match err {
        SessionStateError::Completed => StorageError::Conflict,
        other => StorageError::Serialization(other.to_string()),
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// All tables live behind one mutex, so every trait method is atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryRepository {
    async fn insert_assessment(
        &self,
        draft: AssessmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<AssessmentId, StorageError> {
        let mut guard = self.lock()?;
        let id = AssessmentId::new(guard.next_id());
        let assessment = draft
            .validate(id, created_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.assessments.insert(id, assessment);
        Ok(id)
    }

    async fn get_assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, StorageError> {
        Ok(self.lock()?.assessments.get(&id).cloned())
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>, StorageError> {
        let guard = self.lock()?;
        let mut out: Vec<_> = guard.assessments.values().cloned().collect();
        out.sort_by_key(|a| (a.difficulty_level(), a.id()));
        Ok(out)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_question(
        &self,
        question: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.assessments.contains_key(&question.assessment_id) {
            return Err(StorageError::NotFound);
        }
        let id = QuestionId::new(guard.next_id());
        let question = Question::new(
            id,
            question.assessment_id,
            question.skill,
            question.content,
            question.correct_answer,
            question.difficulty,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.questions.insert(id, question);
        Ok(id)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        Ok(self.lock()?.questions.get(&id).cloned())
    }

    async fn questions_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self.lock()?;
        let mut out: Vec<_> = guard
            .questions
            .values()
            .filter(|q| q.assessment_id() == assessment_id)
            .cloned()
            .collect();
        out.sort_by_key(Question::id);
        Ok(out)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn insert_session(&self, session: NewSessionRecord) -> Result<SessionId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.assessments.contains_key(&session.assessment_id) {
            return Err(StorageError::NotFound);
        }
        let id = SessionId::new(guard.next_id());
        guard.sessions.insert(
            id,
            AssessmentSession::start(id, session.user_id, session.assessment_id, session.started_at),
        );
        Ok(id)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<AssessmentSession>, StorageError> {
        Ok(self.lock()?.sessions.get(&id).cloned())
    }

    async fn sessions_for_user(
        &self,
        user_id: &UserId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<AssessmentSession>, StorageError> {
        let guard = self.lock()?;
        let mut out: Vec<_> = guard
            .sessions
            .values()
            .filter(|s| s.is_owned_by(user_id) && s.assessment_id() == assessment_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.completed_at().is_none(), s.completed_at(), s.id()));
        Ok(out)
    }

    async fn record_response(&self, response: NewResponse) -> Result<Response, StorageError> {
        let mut guard = self.lock()?;
        let key = (response.session_id, response.question_id);
        {
            let session = guard
                .sessions
                .get(&response.session_id)
                .ok_or(StorageError::NotFound)?;
            if session.is_completed() {
                return Err(StorageError::Conflict);
            }
        }
        if guard.answered.contains(&key) {
            return Err(StorageError::AlreadyExists);
        }

        let id = ResponseId::new(guard.next_id());
        let session = guard
            .sessions
            .get_mut(&response.session_id)
            .ok_or(StorageError::NotFound)?;
        session
            .record_answer(response.is_correct)
            .map_err(session_error)?;

        let stored = response.with_id(id);
        guard.answered.insert(key);
        guard.responses.push(stored.clone());
        Ok(stored)
    }

    async fn complete_session(
        &self,
        completion: CompletionRecord,
    ) -> Result<AssessmentSession, StorageError> {
        let mut guard = self.lock()?;
        let session = guard
            .sessions
            .get_mut(&completion.session_id)
            .ok_or(StorageError::NotFound)?;
        if session.is_completed()
            || session.total_questions() != completion.expected_total
            || session.correct_answers() != completion.expected_correct
        {
            return Err(StorageError::Conflict);
        }

        let computed = session.current_score();
        if computed != completion.score {
            return Err(StorageError::Serialization(format!(
                "score mismatch: computed {computed:?}, requested {:?}",
                completion.score
            )));
        }
        session
            .complete(completion.time_taken_secs, completion.completed_at)
            .map_err(session_error)?;
        Ok(session.clone())
    }
}

#[async_trait]
impl ResponseRepository for InMemoryRepository {
    async fn responses_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Response>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .responses
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn responses_with_skills(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ScoredResponse>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .responses
            .iter()
            .filter(|r| r.session_id == session_id)
            .filter_map(|r| {
                guard.questions.get(&r.question_id).map(|q| ScoredResponse {
                    response: r.clone(),
                    skill: q.skill(),
                })
            })
            .collect())
    }
}

/// Aggregates the repositories behind trait objects so the backend is chosen once at startup.
#[derive(Clone)]
pub struct Storage {
    pub assessments: Arc<dyn AssessmentRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Wire every repository slot to the same backend.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: AssessmentRepository
            + QuestionRepository
            + SessionRepository
            + ResponseRepository
            + Clone
            + 'static,
    {
        Self {
            assessments: Arc::new(repo.clone()),
            questions: Arc::new(repo.clone()),
            sessions: Arc::new(repo.clone()),
            responses: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::SessionStatus;
    use assess_core::time::fixed_now;

    async fn seeded() -> (InMemoryRepository, AssessmentId, QuestionId, SessionId) {
        let repo = InMemoryRepository::new();
        let assessment_id = repo
            .insert_assessment(AssessmentDraft::new("Sight Words", "screening"), fixed_now())
            .await
            .unwrap();
        let question_id = repo
            .insert_question(NewQuestionRecord {
                assessment_id,
                skill: SkillType::SightWord,
                content: QuestionContent::with_choices("Find the word 'and'", ["and", "ant"]),
                correct_answer: "and".into(),
                difficulty: 1,
            })
            .await
            .unwrap();
        let session_id = repo
            .insert_session(NewSessionRecord {
                user_id: UserId::new("user-1").unwrap(),
                assessment_id,
                started_at: fixed_now(),
            })
            .await
            .unwrap();
        (repo, assessment_id, question_id, session_id)
    }

    fn answer(session_id: SessionId, question_id: QuestionId, correct: bool) -> NewResponse {
        NewResponse {
            session_id,
            question_id,
            submitted_answer: if correct { "and" } else { "ant" }.into(),
            is_correct: correct,
            elapsed_secs: 3,
            answered_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn record_response_bumps_totals() {
        let (repo, _, question_id, session_id) = seeded().await;
        let stored = repo
            .record_response(answer(session_id, question_id, true))
            .await
            .unwrap();
        assert!(stored.is_correct);

        let session = repo.get_session(session_id).await.unwrap().unwrap();
        assert_eq!(session.total_questions(), 1);
        assert_eq!(session.correct_answers(), 1);

        let joined = repo.responses_with_skills(session_id).await.unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].skill, SkillType::SightWord);
    }

    #[tokio::test]
    async fn duplicate_answers_are_rejected() {
        let (repo, _, question_id, session_id) = seeded().await;
        repo.record_response(answer(session_id, question_id, true))
            .await
            .unwrap();
        let err = repo
            .record_response(answer(session_id, question_id, false))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists));

        let session = repo.get_session(session_id).await.unwrap().unwrap();
        assert_eq!(session.total_questions(), 1);
    }

    #[tokio::test]
    async fn completion_is_conditional_on_totals() {
        let (repo, _, question_id, session_id) = seeded().await;
        repo.record_response(answer(session_id, question_id, true))
            .await
            .unwrap();

        let stale = CompletionRecord {
            session_id,
            expected_total: 0,
            expected_correct: 0,
            score: FinalScore::from_totals(0, 0),
            time_taken_secs: 10,
            completed_at: fixed_now(),
        };
        let err = repo.complete_session(stale).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let fresh = CompletionRecord {
            expected_total: 1,
            expected_correct: 1,
            score: FinalScore::from_totals(1, 1),
            ..stale
        };
        let done = repo.complete_session(fresh).await.unwrap();
        assert_eq!(done.status(), SessionStatus::Completed);
        assert_eq!(done.outcome().unwrap().score_percentage(), 100);

        let err = repo.complete_session(fresh).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn completed_sessions_reject_responses() {
        let (repo, assessment_id, _, session_id) = seeded().await;
        repo.complete_session(CompletionRecord {
            session_id,
            expected_total: 0,
            expected_correct: 0,
            score: FinalScore::from_totals(0, 0),
            time_taken_secs: 0,
            completed_at: fixed_now(),
        })
        .await
        .unwrap();

        let other = repo
            .insert_question(NewQuestionRecord {
                assessment_id,
                skill: SkillType::Rhyme,
                content: QuestionContent::with_choices("Which rhymes with hat?", ["cat", "dog"]),
                correct_answer: "cat".into(),
                difficulty: 1,
            })
            .await
            .unwrap();
        let err = repo
            .record_response(answer(session_id, other, true))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let (repo, _, question_id, _) = seeded().await;
        let err = repo
            .record_response(answer(SessionId::new(999), question_id, true))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
