use async_trait::async_trait;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::NewPatient;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::UpdateClinicalCommand;
use crate::domain::patient::models::UpdateDemographicsCommand;
use crate::domain::user::models::UserId;

/// Port for patient record operations.
///
/// Role checks happen before these are reached; the service trusts its caller.
#[async_trait]
pub trait PatientServicePort: Send + Sync + 'static {
    /// Register a new patient on behalf of `created_by`.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another patient uses this email
    /// * `DatabaseError` - Database operation failed
    async fn create_patient(
        &self,
        command: CreatePatientCommand,
        created_by: UserId,
    ) -> Result<Patient, PatientError>;

    /// List every patient ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_patients(&self) -> Result<Vec<Patient>, PatientError>;

    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_patient(&self, id: &PatientId) -> Result<Patient, PatientError>;

    /// Merge non-empty demographic fields into the stored record.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `EmailAlreadyExists` - Another patient uses the new email
    /// * `DatabaseError` - Database operation failed
    async fn update_demographics(
        &self,
        id: &PatientId,
        command: UpdateDemographicsCommand,
    ) -> Result<Patient, PatientError>;

    /// Overwrite all clinical fields of the stored record.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_clinical(
        &self,
        id: &PatientId,
        command: UpdateClinicalCommand,
    ) -> Result<Patient, PatientError>;

    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_patient(&self, id: &PatientId) -> Result<(), PatientError>;
}

/// Persistence operations for patient aggregate.
#[async_trait]
pub trait PatientRepository: Send + Sync + 'static {
    /// Persist a new patient and assign its id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another patient uses this email
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, patient: NewPatient) -> Result<Patient, PatientError>;

    /// Retrieve all patients ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Patient>, PatientError>;

    /// Retrieve patient by identifier, with the creator's public identity.
    ///
    /// # Returns
    /// Optional patient entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError>;

    /// Write every field of an existing patient back to storage.
    ///
    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `EmailAlreadyExists` - Another patient uses the new email
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, patient: Patient) -> Result<Patient, PatientError>;

    /// # Errors
    /// * `NotFound` - Patient does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &PatientId) -> Result<(), PatientError>;
}
