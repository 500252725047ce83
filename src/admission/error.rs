//! Error types for the admission filter.

use thiserror::Error;

/// Result type for admission filter operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Errors that abort filter construction.
///
/// Nothing on the request path produces these: malformed rule entries are
/// skipped at load time and resolution failures fail open.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Rejection status must be a client or server error code.
    #[error("invalid status code {0}: must be within 400-599")]
    InvalidStatusCode(u16),

    /// Raw configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
