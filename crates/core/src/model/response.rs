use chrono::{DateTime, Utc};

use crate::model::ids::{QuestionId, ResponseId, SessionId};

/// One submitted answer within a session. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: ResponseId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub elapsed_secs: u32,
    pub answered_at: DateTime<Utc>,
}

/// A response that has been scored but not yet assigned an id by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub elapsed_secs: u32,
    pub answered_at: DateTime<Utc>,
}

impl NewResponse {
    #[must_use]
    pub fn with_id(self, id: ResponseId) -> Response {
        Response {
            id,
            session_id: self.session_id,
            question_id: self.question_id,
            submitted_answer: self.submitted_answer,
            is_correct: self.is_correct,
            elapsed_secs: self.elapsed_secs,
            answered_at: self.answered_at,
        }
    }
}
