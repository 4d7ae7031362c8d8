use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and JWT handling.
///
/// One instance holds the signing secret and the token lifetime for a
/// service; it is shared between the login flow and the request middleware.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Token handed out after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Signed JWT access token
    pub access_token: String,
    /// Expiration time (Unix timestamp)
    pub expires_at: i64,
}

impl Authenticator {
    /// Create a new authenticator with default hashing cost and token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Replace the password hasher (e.g. to change the hashing cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Set the lifetime of issued tokens.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.jwt_handler = self.jwt_handler.with_ttl(ttl);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Returns
    /// `false` on mismatch; mismatch is not an error
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is unusable
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Same cost as [`verify_password`](Self::verify_password) but always a
    /// mismatch. Used when the account does not exist.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn verify_password_without_digest(&self, password: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify_without_digest(password)
    }

    /// Issue a signed token for `subject` holding `role`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token<R: Serialize>(
        &self,
        subject: impl ToString,
        role: R,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(subject, role, self.jwt_handler.ttl());
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            expires_at: claims.exp,
        })
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `Malformed`, `BadSignature`, `Expired` - see [`JwtHandler::decode`]
    pub fn validate_token<R: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Claims<R>, JwtError> {
        self.jwt_handler.decode(token)
    }
}
