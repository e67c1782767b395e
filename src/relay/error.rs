// relay/error.rs - HTTP error type for the mail relay
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const EMAIL_FAILED_MESSAGE: &str = "Failed to send email";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Relay error with its status code and client-facing message
#[derive(Debug)]
pub enum RelayError {
    // 400 Bad Request
    MissingFields,
    InvalidJson(String),

    // 500 Internal Server Error
    EmailFailed,
    InternalServerError(String),
}

impl RelayError {
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MissingFields => 400,
            RelayError::InvalidJson(_) => 400,
            RelayError::EmailFailed => 500,
            RelayError::InternalServerError(_) => 500,
        }
    }

    /// Client-safe message
    pub fn message(&self) -> &str {
        match self {
            RelayError::MissingFields => MISSING_FIELDS_MESSAGE,
            RelayError::InvalidJson(msg) => msg,
            RelayError::EmailFailed => EMAIL_FAILED_MESSAGE,
            RelayError::InternalServerError(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::MissingFields => "MISSING_FIELDS",
            RelayError::InvalidJson(_) => "INVALID_JSON",
            RelayError::EmailFailed => "EMAIL_FAILED",
            RelayError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Body in the same shape the delivery client reads: `success` and `message`
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        RelayError::InvalidJson(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        RelayError::InternalServerError(message.into())
    }
}

impl From<super::mailer::MailerError> for RelayError {
    fn from(err: super::mailer::MailerError) -> Self {
        // Provider details stay in the log
        tracing::error!("Mailer error: {}", err);
        RelayError::EmailFailed
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RelayError {}

impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
