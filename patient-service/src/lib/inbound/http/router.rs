use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_patient::create_patient;
use super::handlers::delete_patient::delete_patient;
use super::handlers::get_patient::get_patient;
use super::handlers::get_profile::get_profile;
use super::handlers::list_patients::list_patients;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_medical_info::update_medical_info;
use super::handlers::update_patient::update_patient;
use super::handlers::update_profile::update_profile;
use super::middleware::authenticate;
use super::middleware::require_role;
use crate::access::ports::AuthServicePort;
use crate::patient::ports::PatientServicePort;
use crate::user::models::Role;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub patient_service: Arc<dyn PatientServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    user_service: Arc<dyn UserServicePort>,
    patient_service: Arc<dyn PatientServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        auth_service,
        user_service,
        patient_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/register", post(register));

    let profile_routes = Router::new().route("/profile", get(get_profile).put(update_profile));

    let receptionist_routes = Router::new()
        .route("/patients", post(create_patient).get(list_patients))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route_layer(middleware::from_fn_with_state(
            Role::Receptionist,
            require_role,
        ));

    let doctor_routes = Router::new()
        .route("/doctor/patients", get(list_patients))
        .route("/doctor/patients/:id", get(get_patient))
        .route("/doctor/patients/:id/medical-info", put(update_medical_info))
        .route_layer(middleware::from_fn_with_state(Role::Doctor, require_role));

    // Layered last so it runs before every role gate.
    let protected_routes = Router::new()
        .merge(profile_routes)
        .merge(receptionist_routes)
        .merge(doctor_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Headers are not recorded: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
