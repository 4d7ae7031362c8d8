use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let patient_id = PatientId::from_string(&id).map_err(PatientError::from)?;

    state
        .patient_service
        .delete_patient(&patient_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
