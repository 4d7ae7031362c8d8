use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::Authenticated;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating the caller's profile (raw JSON).
///
/// A field that is present overwrites, even when empty.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, UserError> {
        let email = self.email.map(EmailAddress::new).transpose()?;

        let command = UpdateProfileCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email,
        };
        command.check_lengths()?;

        Ok(command)
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .user_service
        .update_profile(&claims.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, (&PublicUser::from(user)).into()))
}
