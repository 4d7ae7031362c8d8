use thiserror::Error;

use crate::user::errors::EmailError;
use crate::user::errors::FieldTooLongError;

/// Error for PatientId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatientIdError {
    #[error("Invalid patient ID format: {0}")]
    InvalidFormat(String),
}

/// Error for gender parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenderError {
    #[error("Unknown gender '{0}': expected male, female or other")]
    Unknown(String),
}

/// Error for date of birth parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateOfBirthError {
    #[error("Invalid date of birth '{0}': expected YYYY-MM-DD or RFC 3339 timestamp")]
    InvalidFormat(String),
}

/// Top-level error for patient record operations.
///
/// The service itself only produces `NotFound`, `EmailAlreadyExists` and
/// `DatabaseError`; the value-object variants come from request parsing.
#[derive(Debug, Clone, Error)]
pub enum PatientError {
    #[error("Invalid patient ID: {0}")]
    InvalidPatientId(#[from] PatientIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid gender: {0}")]
    InvalidGender(#[from] GenderError),

    #[error("Invalid date of birth: {0}")]
    InvalidDateOfBirth(#[from] DateOfBirthError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field: {0}")]
    FieldTooLong(#[from] FieldTooLongError),

    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Patient email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
