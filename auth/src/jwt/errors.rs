use thiserror::Error;

/// Error type for JWT operations.
///
/// Validation failures are split by cause so callers can tell a token that
/// was never valid from one that merely ran out of time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,
}
