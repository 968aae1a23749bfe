//! Timetable client error types.

use super::convert::MappingError;

/// A failed HTTP round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Could not connect, or the connection broke mid-request
    #[error("connection failed: {0}")]
    Connection(String),

    /// No response within the request timeout
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

/// Errors from the timetable client.
///
/// Only [`Transport`](RzdError::Transport), [`Challenge`](RzdError::Challenge)
/// and [`UnexpectedResult`](RzdError::UnexpectedResult) are retried by the
/// engine; everything else is returned to the caller as soon as it occurs.
#[derive(Debug, thiserror::Error)]
pub enum RzdError {
    /// HTTP request failed (network error, timeout, non-2xx status)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A session token challenge could not be satisfied on this attempt
    #[error("challenge error: {0}")]
    Challenge(String),

    /// The `result` discriminator was missing or had an unknown value
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// The service understood the query and rejected it
    #[error("business error: {0}")]
    Business(String),

    /// A successful response could not be mapped to domain records
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Every attempt failed with a retryable error
    #[error("giving up after {attempts} attempts: {last}")]
    RetryBudgetExhausted { attempts: u32, last: Box<RzdError> },

    /// The caller cancelled the call or its deadline passed
    #[error("request cancelled")]
    Cancelled,

    /// The client could not be constructed from its configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller's parameters cannot be sent upstream
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RzdError {
    /// Whether the engine retries after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RzdError::Transport(_) | RzdError::Challenge(_) | RzdError::UnexpectedResult(_)
        )
    }
}
