use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{AssessmentId, SessionId, UserId};
use crate::scoring::{FinalScore, RiskLevel};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("session already completed")]
    Completed,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("status {status} does not match presence of a final score")]
    OutcomeMismatch { status: SessionStatus },

    #[error("too many answers recorded for a single session")]
    Overflow,

    #[error("unknown session status: {0}")]
    UnknownStatus(String),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = SessionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(SessionStateError::UnknownStatus(other.to_owned())),
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Terminal fields of a session, set exactly once at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub score: FinalScore,
    pub time_taken_secs: u32,
    pub completed_at: DateTime<Utc>,
}

impl SessionOutcome {
    #[must_use]
    pub fn score_percentage(&self) -> u8 {
        self.score.score_percentage
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.score.risk_level
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's attempt at one assessment (the persisted result record).
///
/// Running totals only ever grow while in progress; `complete` freezes them
/// and attaches the final score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentSession {
    id: SessionId,
    user_id: UserId,
    assessment_id: AssessmentId,
    total_questions: u32,
    correct_answers: u32,
    started_at: DateTime<Utc>,
    outcome: Option<SessionOutcome>,
}

impl AssessmentSession {
    /// A freshly started session with zeroed totals.
    #[must_use]
    pub fn start(
        id: SessionId,
        user_id: UserId,
        assessment_id: AssessmentId,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            assessment_id,
            total_questions: 0,
            correct_answers: 0,
            started_at,
            outcome: None,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the stored totals or status are inconsistent.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: SessionId,
        user_id: UserId,
        assessment_id: AssessmentId,
        status: SessionStatus,
        total_questions: u32,
        correct_answers: u32,
        started_at: DateTime<Utc>,
        outcome: Option<SessionOutcome>,
    ) -> Result<Self, SessionStateError> {
        if correct_answers > total_questions {
            return Err(SessionStateError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        match (status, &outcome) {
            (SessionStatus::InProgress, None) | (SessionStatus::Completed, Some(_)) => {}
            _ => return Err(SessionStateError::OutcomeMismatch { status }),
        }
        if let Some(outcome) = &outcome {
            if outcome.completed_at < started_at {
                return Err(SessionStateError::InvalidTimeRange);
            }
        }

        Ok(Self {
            id,
            user_id,
            assessment_id,
            total_questions,
            correct_answers,
            started_at,
            outcome,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.outcome.is_some() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.outcome.map(|o| o.completed_at)
    }

    /// Score computed from the current running totals.
    #[must_use]
    pub fn current_score(&self) -> FinalScore {
        FinalScore::from_totals(self.correct_answers, self.total_questions)
    }

    /// Count one more answered question.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Completed` once the session is finished,
    /// or `Overflow` if the counter cannot grow.
    pub fn record_answer(&mut self, is_correct: bool) -> Result<(), SessionStateError> {
        if self.is_completed() {
            return Err(SessionStateError::Completed);
        }
        let total = self
            .total_questions
            .checked_add(1)
            .ok_or(SessionStateError::Overflow)?;
        let correct = self.correct_answers + u32::from(is_correct);

        self.total_questions = total;
        self.correct_answers = correct;
        Ok(())
    }

    /// Freeze the totals and attach the final score.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Completed` if already finished, or
    /// `InvalidTimeRange` if `completed_at` precedes `started_at`.
    pub fn complete(
        &mut self,
        time_taken_secs: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<FinalScore, SessionStateError> {
        if self.is_completed() {
            return Err(SessionStateError::Completed);
        }
        if completed_at < self.started_at {
            return Err(SessionStateError::InvalidTimeRange);
        }
        let score = self.current_score();
        self.outcome = Some(SessionOutcome {
            score,
            time_taken_secs,
            completed_at,
        });
        Ok(score)
    }
}
