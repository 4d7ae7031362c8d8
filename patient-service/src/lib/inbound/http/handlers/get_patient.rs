use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PatientData;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let patient_id =
        PatientId::from_string(&patient_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .patient_service
        .get_patient(&patient_id)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}
