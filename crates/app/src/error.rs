use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use services::{AppServicesError, AssessmentError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

/// An error rendered as a JSON body with a matching status code.
#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
            is_operational: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn operational(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            is_operational: true,
        }
    }
}

impl From<AssessmentError> for AppError {
    fn from(err: AssessmentError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::not_found(message),
            ErrorKind::InvalidState => Self::conflict(message),
            ErrorKind::Unauthorized => Self::forbidden(message),
            ErrorKind::Internal => {
                tracing::error!(error = %err, "assessment operation failed");
                Self::internal(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            "Internal Error".to_owned()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code.to_owned(),
        };

        (self.status, Json(body)).into_response()
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartupError {
    #[error(transparent)]
    Services(#[from] AppServicesError),
    #[error(transparent)]
    Storage(#[from] storage::repository::StorageError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error(transparent)]
    Serve(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::SessionId;
    use storage::repository::StorageError;

    #[test]
    fn maps_kinds_to_statuses() {
        let cases = [
            (
                AssessmentError::SessionNotFound(SessionId::new(1)),
                StatusCode::NOT_FOUND,
            ),
            (AssessmentError::Completed, StatusCode::CONFLICT),
            (
                AssessmentError::NotOwner(SessionId::new(1)),
                StatusCode::FORBIDDEN,
            ),
            (
                AssessmentError::Storage(StorageError::Connection("closed".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
