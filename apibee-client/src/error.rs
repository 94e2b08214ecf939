//! API client error types.

use http::Method;
use thiserror::Error;

/// Result type for API client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Boxed error carried by failures that wrap a foreign error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not succeed: either the server answered with a
    /// client or server error status, or no usable response arrived.
    #[error("Request failed: {}", failure_summary(.status, .body, .source))]
    RequestFailed {
        /// HTTP status code, `None` when no response was received.
        status: Option<u16>,
        /// Raw response body, empty when no response was received.
        body: String,
        /// Underlying transport failure.
        source: Option<BoxError>,
    },

    /// A path segment cannot be placed in a URL.
    #[error("Invalid segment {segment:?}: {reason}")]
    InvalidSegment {
        /// The rejected segment.
        segment: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The verb cannot be dispatched by the client.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// Encoding or decoding failure.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Failure raised by a shaping or processing hook.
    #[error("Hook error: {0}")]
    Hook(#[source] BoxError),

    /// The HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn failure_summary(status: &Option<u16>, body: &str, source: &Option<BoxError>) -> String {
    match (status, source) {
        (Some(status), _) => format!("{} - {}", status, body),
        (None, Some(source)) => format!("no response - {}", source),
        (None, None) => format!("no response - {}", body),
    }
}

impl ApiError {
    /// Wrap an arbitrary error raised inside a hook.
    pub fn hook(err: impl Into<BoxError>) -> Self {
        Self::Hook(err.into())
    }

    /// A response arrived with a failing status.
    pub fn failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: Some(status),
            body: body.into(),
            source: None,
        }
    }

    /// No usable response arrived: refused connection, timeout, broken body.
    pub fn no_response(err: impl Into<BoxError>) -> Self {
        Self::RequestFailed {
            status: None,
            body: String::new(),
            source: Some(err.into()),
        }
    }

    /// Check if the request failed, with or without a response.
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Check if the request failed before any status was received.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::RequestFailed { status: None, .. })
    }

    /// Get the HTTP status code if the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the response body of a failed request.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::RequestFailed {
                status: Some(_),
                body,
                ..
            } => Some(body),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
