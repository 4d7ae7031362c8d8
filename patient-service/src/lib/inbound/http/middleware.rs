use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::access::errors::AuthError;
use crate::access::models::AuthClaims;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::models::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Validates the bearer token and stores the caller's [`AuthClaims`] in the
/// request extensions. Any failure ends the request with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = verify_request(&state, req.headers()).map_err(|e| {
        tracing::warn!(reason = %e, "Authentication rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn verify_request(state: &AppState, headers: &HeaderMap) -> Result<AuthClaims, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = state.authenticator.validate_token::<Role>(token)?;
    AuthClaims::try_from(claims)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// # Errors
/// * `MissingCredentials` - No Authorization header
/// * `MalformedHeader` - Header is not valid text or uses another scheme
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)
}

/// Claims of the authenticated caller, for handlers and the role gate.
///
/// Rejects with 401 when [`authenticate`] has not run for the request.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub AuthClaims);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthClaims>()
            .copied()
            .map(Authenticated)
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "No authenticated caller on protected route");
                ApiError::Unauthorized(AuthError::MissingCredentials.to_string())
            })
    }
}

/// Role gate. Layer with `from_fn_with_state(role, require_role)` inside
/// [`authenticate`].
pub async fn require_role(
    State(required): State<Role>,
    Authenticated(claims): Authenticated,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    claims.authorize(required).map_err(|e| {
        tracing::warn!(
            user_id = %claims.user_id,
            role = %claims.role,
            required = %required,
            "Authorization rejected"
        );
        ApiError::from(e)
    })?;

    Ok(next.run(req).await)
}
