use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::DateOfBirth;
use crate::domain::patient::models::Gender;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::UpdateDemographicsCommand;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::PatientData;
use crate::inbound::http::router::AppState;

/// HTTP request body for a demographics update (raw JSON).
///
/// Clinical fields, `allergies` included, are not part of this body and are
/// ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub insurance_number: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UpdatePatientRequest {
    fn try_into_command(self) -> Result<UpdateDemographicsCommand, PatientError> {
        // Empty values mean "keep", so they are never validated.
        let email = non_empty(self.email).map(EmailAddress::new).transpose()?;
        let date_of_birth = non_empty(self.date_of_birth)
            .map(|value| DateOfBirth::parse(&value))
            .transpose()?;
        let gender = non_empty(self.gender)
            .map(|value| value.parse::<Gender>())
            .transpose()?;

        let command = UpdateDemographicsCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            phone: self.phone,
            date_of_birth,
            gender,
            address: self.address,
            emergency_contact: self.emergency_contact,
            blood_group: self.blood_group,
            insurance_number: self.insurance_number,
        };
        command.check_lengths()?;

        Ok(command)
    }
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    let patient_id = PatientId::from_string(&id).map_err(PatientError::from)?;
    let command = req.try_into_command()?;

    state
        .patient_service
        .update_demographics(&patient_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::OK, patient.into()))
}
