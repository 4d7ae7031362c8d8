use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::access::errors::AuthError;
use crate::domain::access::models::LoginCommand;
use crate::domain::access::models::LoginOutcome;
use crate::domain::access::ports::AuthServicePort;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service for login and registration.
///
/// Holds no per-request state; the credential store is the only shared
/// mutable resource it touches.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let user = self
            .repository
            .find_by_username(&command.username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let Some(user) = user else {
            // Pay the hashing cost anyway so response time does not tell
            // unknown usernames apart from wrong passwords.
            self.authenticator
                .verify_password_without_digest(&command.password)
                .map_err(|e| AuthError::Internal(e.to_string()))?;
            tracing::warn!("Login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let password_matches = self
            .authenticator
            .verify_password(&command.password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !password_matches {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // Only reachable once the password matched.
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login rejected: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        let issued = self.authenticator.issue_token(user.id, user.role)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

        Ok(LoginOutcome {
            token: issued.access_token,
            expires_at: issued.expires_at,
            user: PublicUser::from(&user),
        })
    }

    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| UserError::Password(e.to_string()))?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            first_name: command.first_name,
            last_name: command.last_name,
            phone: command.phone,
            is_active: true,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            role = %created_user.role,
            "User registered"
        );

        Ok(created_user)
    }
}
