use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::ClinicalInfo;
use crate::domain::patient::models::DateOfBirth;
use crate::domain::patient::models::Demographics;
use crate::domain::patient::models::NewPatient;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::ports::PatientRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// Patient columns joined with the creator's public columns.
///
/// The source is either the `patients` table or a CTE holding the rows a
/// write statement returned, so reads and writes share one row shape.
macro_rules! select_with_creator {
    ($source:literal) => {
        concat!(
            "SELECT p.id, p.first_name, p.last_name, p.email, p.phone, p.date_of_birth, ",
            "p.gender, p.address, p.emergency_contact, p.blood_group, p.insurance_number, ",
            "p.allergies, p.medical_history, p.current_medications, p.created_by, ",
            "p.registration_date, p.created_at, p.updated_at, ",
            "u.username AS creator_username, u.email AS creator_email, ",
            "u.role AS creator_role, u.first_name AS creator_first_name, ",
            "u.last_name AS creator_last_name, u.phone AS creator_phone, ",
            "u.is_active AS creator_is_active, u.created_at AS creator_created_at, ",
            "u.updated_at AS creator_updated_at ",
            "FROM ",
            $source,
            " p LEFT JOIN users u ON u.id = p.created_by"
        )
    };
}

pub struct PostgresPatientRepository {
    pool: PgPool,
}

impl PostgresPatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: String,
    date_of_birth: NaiveDate,
    gender: String,
    address: String,
    emergency_contact: String,
    blood_group: String,
    insurance_number: String,
    allergies: String,
    medical_history: String,
    current_medications: String,
    created_by: i64,
    registration_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    creator_username: Option<String>,
    creator_email: Option<String>,
    creator_role: Option<String>,
    creator_first_name: Option<String>,
    creator_last_name: Option<String>,
    creator_phone: Option<String>,
    creator_is_active: Option<bool>,
    creator_created_at: Option<DateTime<Utc>>,
    creator_updated_at: Option<DateTime<Utc>>,
}

impl PatientRow {
    /// Creator snapshot, present only when the LEFT JOIN matched.
    fn creator(&self) -> Result<Option<PublicUser>, PatientError> {
        let (
            Some(username),
            Some(email),
            Some(role),
            Some(first_name),
            Some(last_name),
            Some(phone),
            Some(is_active),
            Some(created_at),
            Some(updated_at),
        ) = (
            &self.creator_username,
            &self.creator_email,
            &self.creator_role,
            &self.creator_first_name,
            &self.creator_last_name,
            &self.creator_phone,
            self.creator_is_active,
            self.creator_created_at,
            self.creator_updated_at,
        )
        else {
            return Ok(None);
        };

        let role = role
            .parse::<Role>()
            .map_err(|e| PatientError::DatabaseError(format!("creator role: {}", e)))?;

        Ok(Some(PublicUser {
            id: UserId(self.created_by),
            username: username.clone(),
            email: email.clone(),
            role,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            phone: phone.clone(),
            is_active,
            created_at,
            updated_at,
        }))
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = PatientError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let created_by_user = row.creator()?;

        Ok(Patient {
            id: PatientId(row.id),
            demographics: Demographics {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email.map(EmailAddress::new).transpose()?,
                phone: row.phone,
                date_of_birth: DateOfBirth::from_date(row.date_of_birth),
                gender: row.gender.parse()?,
                address: row.address,
                emergency_contact: row.emergency_contact,
                blood_group: row.blood_group,
                insurance_number: row.insurance_number,
            },
            clinical: ClinicalInfo {
                allergies: row.allergies,
                medical_history: row.medical_history,
                current_medications: row.current_medications,
            },
            created_by: UserId(row.created_by),
            created_by_user,
            registration_date: row.registration_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, email: Option<&EmailAddress>) -> PatientError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("patients_email_key") {
            let email = email.map(EmailAddress::as_str).unwrap_or_default();
            return PatientError::EmailAlreadyExists(email.to_string());
        }
    }
    PatientError::DatabaseError(e.to_string())
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    async fn create(&self, patient: NewPatient) -> Result<Patient, PatientError> {
        let sql = concat!(
            "WITH written AS (",
            "INSERT INTO patients (first_name, last_name, email, phone, date_of_birth, gender, ",
            "address, emergency_contact, blood_group, insurance_number, allergies, ",
            "medical_history, current_medications, created_by, registration_date, ",
            "created_at, updated_at) ",
            "VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15, $15) ",
            "RETURNING *) ",
            select_with_creator!("written")
        );

        let demographics = &patient.demographics;
        let row = sqlx::query_as::<_, PatientRow>(sql)
            .bind(&demographics.first_name)
            .bind(&demographics.last_name)
            .bind(demographics.email.as_ref().map(EmailAddress::as_str))
            .bind(&demographics.phone)
            .bind(demographics.date_of_birth.as_date())
            .bind(demographics.gender.as_str())
            .bind(&demographics.address)
            .bind(&demographics.emergency_contact)
            .bind(&demographics.blood_group)
            .bind(&demographics.insurance_number)
            .bind(&patient.clinical.allergies)
            .bind(&patient.clinical.medical_history)
            .bind(&patient.clinical.current_medications)
            .bind(patient.created_by.0)
            .bind(patient.registration_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, demographics.email.as_ref()))?;

        Patient::try_from(row)
    }

    async fn list_all(&self) -> Result<Vec<Patient>, PatientError> {
        let rows = sqlx::query_as::<_, PatientRow>(concat!(
            select_with_creator!("patients"),
            " ORDER BY p.id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Patient::try_from).collect()
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError> {
        let row = sqlx::query_as::<_, PatientRow>(concat!(
            select_with_creator!("patients"),
            " WHERE p.id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        row.map(Patient::try_from).transpose()
    }

    async fn update(&self, patient: Patient) -> Result<Patient, PatientError> {
        // created_by and registration_date are fixed at create.
        let sql = concat!(
            "WITH written AS (",
            "UPDATE patients SET first_name = $2, last_name = $3, email = $4, phone = $5, ",
            "date_of_birth = $6, gender = $7, address = $8, emergency_contact = $9, ",
            "blood_group = $10, insurance_number = $11, allergies = $12, ",
            "medical_history = $13, current_medications = $14, updated_at = $15 ",
            "WHERE id = $1 RETURNING *) ",
            select_with_creator!("written")
        );

        let demographics = &patient.demographics;
        let row = sqlx::query_as::<_, PatientRow>(sql)
            .bind(patient.id.0)
            .bind(&demographics.first_name)
            .bind(&demographics.last_name)
            .bind(demographics.email.as_ref().map(EmailAddress::as_str))
            .bind(&demographics.phone)
            .bind(demographics.date_of_birth.as_date())
            .bind(demographics.gender.as_str())
            .bind(&demographics.address)
            .bind(&demographics.emergency_contact)
            .bind(&demographics.blood_group)
            .bind(&demographics.insurance_number)
            .bind(&patient.clinical.allergies)
            .bind(&patient.clinical.medical_history)
            .bind(&patient.clinical.current_medications)
            .bind(patient.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, demographics.email.as_ref()))?;

        match row {
            Some(row) => Patient::try_from(row),
            None => Err(PatientError::NotFound(patient.id.to_string())),
        }
    }

    async fn delete(&self, id: &PatientId) -> Result<(), PatientError> {
        let result = sqlx::query(
            r#"
            DELETE FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PatientError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
