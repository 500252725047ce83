//! Error types for the HTTP hosting surface.

use std::io;
use thiserror::Error;

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors that can occur while hosting the filter over HTTP.
#[derive(Debug, Error)]
pub enum HttpError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed request or response bytes.
    #[error("parse error: {0}")]
    Parse(String),

    /// More bytes are needed before the request head is complete.
    #[error("incomplete request")]
    PartialRequest,

    /// Invalid HTTP method.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// Invalid request URI.
    #[error("invalid URI: {0}")]
    InvalidUri(String),

    /// Request exceeded the configured size limit.
    #[error("request too large: {size} bytes (max: {max})")]
    RequestTooLarge {
        /// Actual size.
        size: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Timed out waiting for the client.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<httparse::Error> for HttpError {
    fn from(err: httparse::Error) -> Self {
        HttpError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HttpError::RequestTooLarge {
            size: 100_000,
            max: 65_536,
        };
        assert_eq!(err.to_string(), "request too large: 100000 bytes (max: 65536)");

        let err = HttpError::PartialRequest;
        assert_eq!(err.to_string(), "incomplete request");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(HttpError::from(io_err), HttpError::Io(_)));
    }
}
