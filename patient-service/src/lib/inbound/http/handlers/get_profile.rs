use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::PublicUser;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::Authenticated;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get_user(&claims.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, (&PublicUser::from(user)).into()))
}
