//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::{AssessmentId, QuestionId, SessionId, SessionStateError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Coarse error class the presentation boundary maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    Unauthorized,
    Internal,
}

/// Errors emitted by the assessment services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment {0} not found")]
    AssessmentNotFound(AssessmentId),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error("session {0} belongs to another user")]
    NotOwner(SessionId),
    #[error("session already completed")]
    Completed,
    #[error("session is still in progress")]
    InProgress,
    #[error("question already answered in this session")]
    DuplicateResponse,
    #[error(transparent)]
    Domain(#[from] assess_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AssessmentError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessmentError::AssessmentNotFound(_)
            | AssessmentError::SessionNotFound(_)
            | AssessmentError::QuestionNotFound(_)
            | AssessmentError::Storage(StorageError::NotFound) => ErrorKind::NotFound,
            AssessmentError::NotOwner(_) => ErrorKind::Unauthorized,
            AssessmentError::Completed
            | AssessmentError::InProgress
            | AssessmentError::DuplicateResponse
            | AssessmentError::Storage(StorageError::Conflict | StorageError::AlreadyExists)
            | AssessmentError::Domain(assess_core::Error::Session(SessionStateError::Completed)) => {
                ErrorKind::InvalidState
            }
            AssessmentError::Domain(_) | AssessmentError::Storage(_) => ErrorKind::Internal,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            AssessmentError::SessionNotFound(SessionId::new(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AssessmentError::NotOwner(SessionId::new(1)).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(AssessmentError::Completed.kind(), ErrorKind::InvalidState);
        assert_eq!(
            AssessmentError::DuplicateResponse.kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            AssessmentError::from(StorageError::Conflict).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            AssessmentError::from(StorageError::Connection("down".into())).kind(),
            ErrorKind::Internal
        );
        let invalid_time = assess_core::Error::from(SessionStateError::InvalidTimeRange);
        assert_eq!(
            AssessmentError::from(invalid_time).kind(),
            ErrorKind::Internal
        );
    }
}
