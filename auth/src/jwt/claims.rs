use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// JWT claims binding a subject to a role.
///
/// The role type is chosen by the service; it only has to round-trip through
/// serde, so a closed enum rejects unknown role strings at decode time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims<R> {
    /// Subject (user identifier)
    pub sub: String,

    /// Role granted to the subject
    pub role: R,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl<R> Claims<R> {
    /// Create claims issued now that expire after `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `role` - Role carried by the token
    /// * `ttl` - Lifetime of the token
    pub fn for_subject(subject: impl ToString, role: R, ttl: Duration) -> Self {
        Self::issued_at(subject, role, Utc::now(), ttl)
    }

    /// Create claims with an explicit issue instant.
    pub fn issued_at(
        subject: impl ToString,
        role: R,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is no longer valid at the exact second of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
