use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::access::models::LoginCommand;
use crate::access::models::LoginOutcome;
use crate::access::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .auth_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| ApiSuccess::new(StatusCode::OK, outcome.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, ParseLoginRequestError> {
        if self.username.is_empty() {
            return Err(ParseLoginRequestError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(ParseLoginRequestError::MissingField("password"));
        }
        Ok(LoginCommand {
            username: self.username,
            password: self.password,
        })
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub user: UserData,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            token: outcome.token.clone(),
            expires_at: outcome.expires_at,
            user: (&outcome.user).into(),
        }
    }
}
