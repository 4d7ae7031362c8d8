use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::access::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, (&PublicUser::from(user)).into()))
}

/// HTTP request body for registering a staff account (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequestBody {
    username: String,
    email: String,
    password: String,
    role: String,
    first_name: String,
    last_name: String,
    phone: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let role: Role = self.role.parse()?;

        if self.first_name.is_empty() {
            return Err(UserError::MissingField("first_name"));
        }
        if self.last_name.is_empty() {
            return Err(UserError::MissingField("last_name"));
        }

        let command = RegisterUserCommand {
            username,
            email,
            password,
            role,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        };
        command.check_lengths()?;

        Ok(command)
    }
}
