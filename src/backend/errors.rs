use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Entity not found")]
    NotFound,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Backend error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Error bodies returned by the REST (`message`) and auth
/// (`error_description`, `msg`, `error`) surfaces.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

impl BackendError {
    /// Maps a non-success response to an error, keeping the backend's message.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.code.clone();
        let message = parsed
            .message
            .or(parsed.error_description)
            .or(parsed.msg)
            .or(parsed.error)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });

        match (status, code.as_deref()) {
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
                BackendError::Unauthorized(message)
            }
            // Postgres unique, foreign key, not null and check violations.
            (_, Some("23505" | "23503" | "23502" | "23514")) | (StatusCode::CONFLICT, _) => {
                BackendError::ConstraintViolation(message)
            }
            _ => BackendError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Message suitable for returning to API callers.
    pub fn message(&self) -> String {
        match self {
            BackendError::Http { message, .. }
            | BackendError::Unauthorized(message)
            | BackendError::ConstraintViolation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::DecodeError(err.to_string())
        } else {
            BackendError::ConnectionError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::DecodeError(err.to_string())
    }
}
