use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for issuing and validating stateless access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signature covers the whole claim set,
/// so any change to subject, role or expiry invalidates the token.
///
/// There is no revocation list: a token stays valid until it expires.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtHandler {
    /// Lifetime of issued tokens unless overridden with [`JwtHandler::with_ttl`].
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl: Duration::hours(Self::DEFAULT_TTL_HOURS),
        }
    }

    /// Override the lifetime of issued tokens.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` holding `role`, expiring after the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue<R: Serialize>(
        &self,
        subject: impl ToString,
        role: R,
    ) -> Result<String, JwtError> {
        self.encode(&Claims::for_subject(subject, role, self.ttl))
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<R: Serialize>(&self, claims: &Claims<R>) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The signature is checked before the expiry, so a foreign token is
    /// reported as `BadSignature` even when it has also expired.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed into the expected claims
    /// * `BadSignature` - Signature does not verify under this secret
    /// * `Expired` - Current time is at or past the `exp` claim
    pub fn decode<R: DeserializeOwned>(&self, token: &str) -> Result<Claims<R>, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<Claims<R>>(token, &self.decoding_key, &validation).map_err(classify)?;

        if token_data.claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(token_data.claims)
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::BadSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(error.to_string()),
    }
}
