use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PatientData;
use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::DateOfBirth;
use crate::domain::patient::models::Demographics;
use crate::domain::patient::models::Gender;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::middleware::Authenticated;
use crate::inbound::http::router::AppState;

pub async fn create_patient(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Json(body): Json<CreatePatientRequest>,
) -> Result<ApiSuccess<PatientData>, ApiError> {
    state
        .patient_service
        .create_patient(body.try_into_command()?, claims.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref patient| ApiSuccess::new(StatusCode::CREATED, patient.into()))
}

/// HTTP request body for registering a patient (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreatePatientRequest {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: String,
    gender: String,
    address: String,
    emergency_contact: String,
    blood_group: String,
    allergies: String,
    insurance_number: String,
}

fn required(value: String, field: &'static str) -> Result<String, PatientError> {
    if value.is_empty() {
        Err(PatientError::MissingField(field))
    } else {
        Ok(value)
    }
}

impl CreatePatientRequest {
    fn try_into_command(self) -> Result<CreatePatientCommand, PatientError> {
        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;
        let phone = required(self.phone, "phone")?;
        let date_of_birth = DateOfBirth::parse(&required(self.date_of_birth, "date_of_birth")?)?;
        let gender: Gender = required(self.gender, "gender")?.parse()?;

        // Stored as absent so patients without email never collide.
        let email = if self.email.is_empty() {
            None
        } else {
            Some(EmailAddress::new(self.email)?)
        };

        let demographics = Demographics {
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            gender,
            address: self.address,
            emergency_contact: self.emergency_contact,
            blood_group: self.blood_group,
            insurance_number: self.insurance_number,
        };
        demographics.check_lengths()?;

        Ok(CreatePatientCommand {
            demographics,
            allergies: self.allergies,
        })
    }
}
