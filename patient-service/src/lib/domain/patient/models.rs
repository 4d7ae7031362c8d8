use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::patient::errors::DateOfBirthError;
use crate::domain::patient::errors::GenderError;
use crate::domain::patient::errors::PatientIdError;
use crate::domain::user::errors::FieldTooLongError;
use crate::domain::user::models::check_length;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NAME_MAX_LENGTH;
use crate::domain::user::models::PHONE_MAX_LENGTH;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::UserId;

/// Patient aggregate entity.
///
/// Demographic and clinical fields are kept in separate groups because they
/// are written through separate operations with separate role gates.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: PatientId,
    pub demographics: Demographics,
    pub clinical: ClinicalInfo,
    /// Reference to the registering user, not ownership.
    pub created_by: UserId,
    /// Creator's public identity at read time, if the user still resolves.
    pub created_by_user: Option<PublicUser>,
    pub registration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Merge a demographics update.
    ///
    /// A field that is absent or empty keeps the stored value, so this path
    /// can never clear a field.
    pub fn apply_demographics(&mut self, update: UpdateDemographicsCommand, now: DateTime<Utc>) {
        let current = &mut self.demographics;

        overwrite_if_set(&mut current.first_name, update.first_name);
        overwrite_if_set(&mut current.last_name, update.last_name);
        overwrite_if_set(&mut current.phone, update.phone);
        overwrite_if_set(&mut current.address, update.address);
        overwrite_if_set(&mut current.emergency_contact, update.emergency_contact);
        overwrite_if_set(&mut current.blood_group, update.blood_group);
        overwrite_if_set(&mut current.insurance_number, update.insurance_number);

        if let Some(email) = update.email {
            current.email = Some(email);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            current.date_of_birth = date_of_birth;
        }
        if let Some(gender) = update.gender {
            current.gender = gender;
        }

        self.updated_at = now;
    }

    /// Replace all clinical fields, empty values included.
    pub fn apply_clinical(&mut self, update: UpdateClinicalCommand, now: DateTime<Utc>) {
        self.clinical = ClinicalInfo {
            allergies: update.allergies,
            medical_history: update.medical_history,
            current_medications: update.current_medications,
        };
        self.updated_at = now;
    }
}

fn overwrite_if_set(slot: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *slot = value;
    }
}

/// Patient unique identifier type, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(pub i64);

impl PatientId {
    /// Parse a patient ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, PatientIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            Ok(id) => Err(PatientIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(PatientIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = GenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(GenderError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar date of birth.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, in which
/// case only the date part is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// # Errors
    /// * `InvalidFormat` - Neither a date nor an RFC 3339 timestamp
    pub fn parse(value: &str) -> Result<Self, DateOfBirthError> {
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        DateTime::parse_from_rfc3339(value)
            .map(|timestamp| Self(timestamp.date_naive()))
            .map_err(|_| DateOfBirthError::InvalidFormat(value.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

/// Non-clinical patient attributes, maintained by the front desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demographics {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<EmailAddress>,
    pub phone: String,
    pub date_of_birth: DateOfBirth,
    pub gender: Gender,
    pub address: String,
    pub emergency_contact: String,
    pub blood_group: String,
    pub insurance_number: String,
}

const BLOOD_GROUP_MAX_LENGTH: usize = 8;
const INSURANCE_NUMBER_MAX_LENGTH: usize = 64;

impl Demographics {
    /// Reject values wider than their stored column.
    pub fn check_lengths(&self) -> Result<(), FieldTooLongError> {
        check_length("first_name", &self.first_name, NAME_MAX_LENGTH)?;
        check_length("last_name", &self.last_name, NAME_MAX_LENGTH)?;
        check_length("phone", &self.phone, PHONE_MAX_LENGTH)?;
        check_length("blood_group", &self.blood_group, BLOOD_GROUP_MAX_LENGTH)?;
        check_length(
            "insurance_number",
            &self.insurance_number,
            INSURANCE_NUMBER_MAX_LENGTH,
        )
    }
}

/// Sensitive clinical attributes, maintained by doctors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicalInfo {
    pub allergies: String,
    pub medical_history: String,
    pub current_medications: String,
}

/// Patient record ready to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub demographics: Demographics,
    pub clinical: ClinicalInfo,
    pub created_by: UserId,
    pub registration_date: DateTime<Utc>,
}

/// Command to register a new patient.
///
/// Allergies may be recorded at intake; the other clinical fields start empty.
#[derive(Debug)]
pub struct CreatePatientCommand {
    pub demographics: Demographics,
    pub allergies: String,
}

/// Partial demographics update. `None` and empty strings both mean "keep".
#[derive(Debug, Default)]
pub struct UpdateDemographicsCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub phone: Option<String>,
    pub date_of_birth: Option<DateOfBirth>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub insurance_number: Option<String>,
}

impl UpdateDemographicsCommand {
    /// Same column widths as [`Demographics::check_lengths`], for the
    /// fields that are present.
    pub fn check_lengths(&self) -> Result<(), FieldTooLongError> {
        let bounded = [
            ("first_name", &self.first_name, NAME_MAX_LENGTH),
            ("last_name", &self.last_name, NAME_MAX_LENGTH),
            ("phone", &self.phone, PHONE_MAX_LENGTH),
            ("blood_group", &self.blood_group, BLOOD_GROUP_MAX_LENGTH),
            (
                "insurance_number",
                &self.insurance_number,
                INSURANCE_NUMBER_MAX_LENGTH,
            ),
        ];
        for (field, value, max) in bounded {
            if let Some(value) = value {
                check_length(field, value, max)?;
            }
        }
        Ok(())
    }
}

/// Full clinical update; every field is written as given.
#[derive(Debug, Default)]
pub struct UpdateClinicalCommand {
    pub medical_history: String,
    pub current_medications: String,
    pub allergies: String,
}
