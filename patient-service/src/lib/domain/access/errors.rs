use auth::JwtError;
use thiserror::Error;

use crate::domain::user::models::Role;

/// Authentication failures.
///
/// Everything here means "we do not know who you are" (401-class). Login
/// collapses unknown usernames and wrong passwords into `InvalidCredentials`
/// so the response does not reveal which accounts exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingCredentials,

    #[error("Invalid authorization format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDisabled,

    #[error("Authentication failed: {0}")]
    Internal(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed(msg) => AuthError::MalformedToken(msg),
            JwtError::BadSignature => AuthError::BadSignature,
            JwtError::Expired => AuthError::Expired,
            JwtError::EncodingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

/// Authenticated caller lacks the role a route requires (403-class).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Insufficient permissions: {required} role required")]
pub struct ForbiddenError {
    pub required: Role,
    pub actual: Role,
}
