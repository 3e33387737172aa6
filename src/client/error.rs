//! Frame request error types

use thiserror::Error;

/// Frame request error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FrameError {
    pub kind: FrameErrorKind,
    pub message: String,
}

impl FrameError {
    pub fn new(kind: FrameErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::Timeout, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::ServerError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FrameErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// Connection refused, DNS, reset
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Proxy or frame server answered 5xx
    ServerError,
    /// Proxy rejected the request (4xx)
    InvalidRequest,
    /// Body did not decode into the expected shape
    Malformed,
    /// Unknown error
    Unknown,
}

impl FrameErrorKind {
    /// Malformed bodies are reported apart from transport failures
    pub fn is_malformed(self) -> bool {
        matches!(self, Self::Malformed)
    }
}
