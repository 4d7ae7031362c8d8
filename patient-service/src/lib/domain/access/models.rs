use crate::domain::access::errors::AuthError;
use crate::domain::access::errors::ForbiddenError;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// Verified identity of the caller for one request.
///
/// Built only from a token that passed signature and expiry checks; handlers
/// receive it as a typed value instead of reading an untyped context map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthClaims {
    /// Require an exact role match. There is no role hierarchy.
    ///
    /// # Errors
    /// * `ForbiddenError` - Caller holds a different role
    pub fn authorize(&self, required: Role) -> Result<(), ForbiddenError> {
        if self.role == required {
            Ok(())
        } else {
            Err(ForbiddenError {
                required,
                actual: self.role,
            })
        }
    }
}

impl TryFrom<auth::Claims<Role>> for AuthClaims {
    type Error = AuthError;

    fn try_from(claims: auth::Claims<Role>) -> Result<Self, Self::Error> {
        let user_id = UserId::from_string(&claims.sub)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        Ok(Self {
            user_id,
            role: claims.role,
        })
    }
}

/// Login credentials as submitted; no format rules beyond being non-empty.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: i64,
    pub user: PublicUser,
}
