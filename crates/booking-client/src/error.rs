//! Error types for booking store requests.

use booking_engine::forms::FormError;
use booking_engine::{BookingError, RejectionReason};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message used when the store's error body carries no usable text.
const FALLBACK_MESSAGE: &str = "request failed";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The store could not be reached, or did not answer in time.
    #[error("could not reach the booking server: {0}")]
    Connection(String),

    /// The credential is missing, expired or invalid. The session that made
    /// the request must be discarded.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The store refused the request (4xx); `message` is its own wording.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The store failed to handle the request (5xx).
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A form field failed its local check; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] FormError),

    /// The booking was rejected locally; nothing was sent.
    #[error(transparent)]
    Booking(#[from] RejectionReason),

    #[error(transparent)]
    Engine(#[from] BookingError),
}

impl ApiError {
    /// Whether the session that made the request is no longer usable.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_builder() {
            ApiError::Config(value.to_string())
        } else if value.is_decode() {
            ApiError::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            from_status(status, "")
        } else {
            ApiError::Connection(value.to_string())
        }
    }
}

/// Error body sent by the store: `{ "error": "...", "details": [...] }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Map a non-success status and its raw body to an [`ApiError`].
pub(crate) fn from_status(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized(message)
    } else if status.is_client_error() {
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
