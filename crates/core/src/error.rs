use thiserror::Error;

use crate::model::{AssessmentError, QuestionError, SessionStateError, UserIdError};

/// Any validation failure raised by the domain model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Session(#[from] SessionStateError),
    #[error(transparent)]
    UserId(#[from] UserIdError),
}
