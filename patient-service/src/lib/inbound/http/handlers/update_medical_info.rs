use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PatientData;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::UpdateClinicalCommand;
use crate::domain::patient::ports::PatientServicePort;
use crate::inbound::http::middleware::Authenticated;
use crate::inbound::http::router::AppState;

/// Clinical fields. Every field is written; a missing one clears.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMedicalInfoRequest {
    medical_history: String,
    current_medications: String,
    allergies: String,
}

impl From<UpdateMedicalInfoRequest> for UpdateClinicalCommand {
    fn from(req: UpdateMedicalInfoRequest) -> Self {
        Self {
            medical_history: req.medical_history,
            current_medications: req.current_medications,
            allergies: req.allergies,
        }
    }
}

pub async fn update_medical_info(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateMedicalInfoRequest>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let patient_id = PatientId::from_string(&id).map_err(PatientError::from)?;

    tracing::info!(
        patient_id = %patient_id,
        doctor_id = %claims.user_id,
        "Clinical update requested"
    );

    state
        .patient_service
        .update_clinical(&patient_id, req.into())
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}
