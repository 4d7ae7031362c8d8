use async_trait::async_trait;

use crate::domain::access::errors::AuthError;
use crate::domain::access::models::LoginCommand;
use crate::domain::access::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for credential operations: login and registration.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token bound to the stored role.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `AccountDisabled` - Password matched but the account is inactive
    /// * `Internal` - Storage, hashing or signing failure
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Hash the password and persist a new, active user.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;
}
