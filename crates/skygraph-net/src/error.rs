//! Error types for the query client.

use skygraph_core::AbortReason;
use thiserror::Error;

/// Errors raised while talking to the graph query service.
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `RequestFailed` | the server answered with a non-success status |
/// | `Decode` | a response body or NDJSON line is not valid JSON for the expected type |
/// | `Aborted` | the caller's abort signal fired |
///
/// The remaining variants cover transport-level failures from the HTTP client.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The server answered with a status outside the success range.
    #[error("request failed with HTTP {status}")]
    RequestFailed {
        /// The HTTP status code.
        status: u16,
        /// The response body, read as text. Empty if it could not be read.
        body: String,
    },
    /// The response body did not decode as the expected JSON.
    #[error("decode error: {0}")]
    Decode(String),
    /// The operation was aborted through its signal.
    #[error("aborted: {0}")]
    Aborted(AbortReason),
    /// Invalid URL provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Invalid header name or value.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Connection refused or failed.
    #[error("connection error: {0}")]
    Connection(String),
    /// Request timed out.
    #[error("request timed out")]
    Timeout,
    /// Any other HTTP client failure.
    #[error("HTTP request error: {0}")]
    Request(String),
}

impl NetworkError {
    /// The HTTP status for `RequestFailed`, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a `RequestFailed` with status 404.
    ///
    /// Callers use this to map a missing actor onto a "not found" state.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True if the operation was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    /// True if a body failed to decode.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<AbortReason> for NetworkError {
    fn from(reason: AbortReason) -> Self {
        Self::Aborted(reason)
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// A specialized Result type for query client operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
