/// A teacher identifier that is not present in the loaded roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("teacher not found: {0}")]
pub struct UnknownTeacher(pub String);

/// Failure talking to the roster API.
///
/// Every variant is a transport-level error: the request did not produce the
/// response the client needed. None of them carry partial results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, TLS, timeout).
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    /// The server answered with an unexpected status code.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    /// The response body could not be decoded.
    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// The endpoint path the failing request targeted.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}
