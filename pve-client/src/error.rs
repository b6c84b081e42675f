///! Client error type

use reqwest::StatusCode;
use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally before any request was sent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection, TLS or I/O failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with something other than 200
    #[error("HTTP error: {status} ({method} {path})")]
    Http {
        status: StatusCode,
        method: String,
        path: String,
    },

    /// Body was not a `{"data": ...}` envelope of the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Payload could not be materialized into a typed record
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// HTTP status for [`ClientError::Http`]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected the ticket. Tickets are not refreshed, so the
    /// caller has to log in again.
    pub fn is_auth_expired(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
