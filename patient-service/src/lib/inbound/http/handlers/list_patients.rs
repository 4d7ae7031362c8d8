use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PatientData;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<PatientData>>, ApiError> {
    state
        .patient_service
        .list_patients()
        .await
        .map_err(ApiError::from)
        .map(|patients| {
            ApiSuccess::new(
                StatusCode::OK,
                patients.iter().map(PatientData::from).collect(),
            )
        })
}
