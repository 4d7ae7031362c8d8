use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use crate::access::errors::AuthError;
use crate::access::errors::ForbiddenError;
use crate::patient::errors::PatientError;
use crate::patient::models::Gender;
use crate::patient::models::Patient;
use crate::user::errors::UserError;
use crate::user::models::PublicUser;
use crate::user::models::Role;

pub mod create_patient;
pub mod delete_patient;
pub mod get_patient;
pub mod get_profile;
pub mod list_patients;
pub mod login;
pub mod register;
pub mod update_medical_info;
pub mod update_patient;
pub mod update_profile;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_)
            | UserError::MissingField(_)
            | UserError::FieldTooLong(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
            _ => ApiError::Unauthorized(err.to_string()),
        }
    }
}

impl From<ForbiddenError> for ApiError {
    fn from(err: ForbiddenError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PatientError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            PatientError::InvalidPatientId(_) => ApiError::BadRequest(err.to_string()),
            PatientError::InvalidEmail(_)
            | PatientError::InvalidGender(_)
            | PatientError::InvalidDateOfBirth(_)
            | PatientError::MissingField(_)
            | PatientError::FieldTooLong(_) => ApiError::UnprocessableEntity(err.to_string()),
            PatientError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Outward view of a user. There is no password field to leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PublicUser> for UserData {
    fn from(user: &PublicUser) -> Self {
        Self {
            id: user.id.0,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientData {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub emergency_contact: String,
    pub blood_group: String,
    pub allergies: String,
    pub medical_history: String,
    pub current_medications: String,
    pub insurance_number: String,
    pub created_by: i64,
    pub created_by_user: Option<UserData>,
    pub registration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Patient> for PatientData {
    fn from(patient: &Patient) -> Self {
        let demographics = &patient.demographics;
        Self {
            id: patient.id.0,
            first_name: demographics.first_name.clone(),
            last_name: demographics.last_name.clone(),
            email: demographics
                .email
                .as_ref()
                .map(|email| email.as_str().to_string())
                .unwrap_or_default(),
            phone: demographics.phone.clone(),
            date_of_birth: demographics.date_of_birth.as_date(),
            gender: demographics.gender,
            address: demographics.address.clone(),
            emergency_contact: demographics.emergency_contact.clone(),
            blood_group: demographics.blood_group.clone(),
            allergies: patient.clinical.allergies.clone(),
            medical_history: patient.clinical.medical_history.clone(),
            current_medications: patient.clinical.current_medications.clone(),
            insurance_number: demographics.insurance_number.clone(),
            created_by: patient.created_by.0,
            created_by_user: patient.created_by_user.as_ref().map(UserData::from),
            registration_date: patient.registration_date,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}
