use thiserror::Error;

use crate::models::ErrorResponse;
use crate::schema::ValidationError;

/// Error type for S&S Activewear API operations.
///
/// - `InvalidAccountNumber` / `InvalidToken` — rejected at construction,
///   before any network activity
/// - `Validation` — a payload (outbound or inbound) broke its schema
/// - `BadRequest` — HTTP 400, carries the parsed error body
/// - `Api` — any other non-2xx status code
/// - `RequestFailed` — network/transport errors (wraps `reqwest::Error`)
#[derive(Debug, Error)]
pub enum SsActivewearError {
    #[error("Account number is not a valid number: {0:?}")]
    InvalidAccountNumber(String),

    #[error("Token is not a valid UUID: {source}")]
    InvalidToken { source: uuid::Error },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    BadRequest {
        message: String,
        response: ErrorResponse,
    },

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl SsActivewearError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, SsActivewearError::BadRequest { .. })
    }

    /// Structured body of a 400 answer.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            SsActivewearError::BadRequest { response, .. } => Some(response),
            _ => None,
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SsActivewearError::BadRequest { .. } => Some(400),
            SsActivewearError::Api { status, .. } => Some(*status),
            SsActivewearError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SsActivewearError>;
