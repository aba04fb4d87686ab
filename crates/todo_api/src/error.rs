//! HTTP error mapping for the todo API.
//!
//! # Responsibility
//! - Translate service errors into status codes and JSON error bodies.
//! - Log every failed request exactly once, at the response boundary.
//!
//! # Invariants
//! - Validation failures are 400 with `{error}`.
//! - Malformed payloads are 400 with `{error, detail}`.
//! - Unknown ids are 404 with `{error}`.
//! - Anything else is 500 with `{error, detail}`; `detail` carries the raw
//!   underlying error text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use todo_core::TodoServiceError;

const MALFORMED_PAYLOAD_MESSAGE: &str = "Malformed request payload.";
const NOT_FOUND_MESSAGE: &str = "Todo item not found.";
const UNEXPECTED_MESSAGE: &str = "An error occurred while processing the request.";

/// Request-level failure returned by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Field rule violation; the message is returned verbatim.
    Validation(String),
    /// Body or query string could not be decoded.
    MalformedPayload(String),
    NotFound,
    /// Storage or runtime failure with its raw detail.
    Unexpected(String),
}

impl ApiError {
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(message) => ErrorBody {
                error: message.clone(),
                detail: None,
            },
            Self::MalformedPayload(detail) => ErrorBody {
                error: MALFORMED_PAYLOAD_MESSAGE.to_string(),
                detail: Some(detail.clone()),
            },
            Self::NotFound => ErrorBody {
                error: NOT_FOUND_MESSAGE.to_string(),
                detail: None,
            },
            Self::Unexpected(detail) => ErrorBody {
                error: UNEXPECTED_MESSAGE.to_string(),
                detail: Some(detail.clone()),
            },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::MalformedPayload(detail) => write!(f, "{MALFORMED_PAYLOAD_MESSAGE} {detail}"),
            Self::NotFound => write!(f, "{NOT_FOUND_MESSAGE}"),
            Self::Unexpected(detail) => write!(f, "{UNEXPECTED_MESSAGE} {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            TodoServiceError::Validation(err) => Self::Validation(err.to_string()),
            TodoServiceError::NotFound(_) => Self::NotFound,
            other => Self::Unexpected(other.to_string()),
        }
    }
}

/// JSON error body: `{error}` or `{error, detail}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=api status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=request_failed module=api status={} error={}",
                status.as_u16(),
                self
            );
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use todo_core::{RepoError, TodoServiceError, TodoValidationError};

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let validation: ApiError =
            TodoServiceError::Validation(TodoValidationError::TitleTooLong).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            validation,
            ApiError::Validation("Title is too long (maximum 150 characters).".to_string())
        );

        let not_found: ApiError = TodoServiceError::NotFound(3).into();
        assert_eq!(not_found, ApiError::NotFound);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let corrupt: ApiError =
            TodoServiceError::Repo(RepoError::InvalidData("bad row".to_string())).into();
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(corrupt, ApiError::Unexpected(detail) if detail.contains("bad row")));
    }

    #[test]
    fn only_payload_and_unexpected_errors_carry_detail() {
        assert!(ApiError::NotFound.body().detail.is_none());
        assert!(ApiError::Validation("x".into()).body().detail.is_none());
        assert_eq!(
            ApiError::unexpected("disk full").body().detail.as_deref(),
            Some("disk full")
        );
        assert_eq!(
            ApiError::MalformedPayload("eof".into()).body().error,
            "Malformed request payload."
        );
    }
}
