use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::ClinicalInfo;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::NewPatient;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::UpdateClinicalCommand;
use crate::domain::patient::models::UpdateDemographicsCommand;
use crate::domain::patient::ports::PatientRepository;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for patient records.
pub struct PatientService<PR>
where
    PR: PatientRepository,
{
    repository: Arc<PR>,
}

impl<PR> PatientService<PR>
where
    PR: PatientRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    async fn load(&self, id: &PatientId) -> Result<Patient, PatientError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PatientError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<PR> PatientServicePort for PatientService<PR>
where
    PR: PatientRepository,
{
    async fn create_patient(
        &self,
        command: CreatePatientCommand,
        created_by: UserId,
    ) -> Result<Patient, PatientError> {
        let patient = NewPatient {
            demographics: command.demographics,
            clinical: ClinicalInfo {
                allergies: command.allergies,
                ..Default::default()
            },
            created_by,
            registration_date: Utc::now(),
        };

        let created_patient = self.repository.create(patient).await?;
        tracing::info!(
            patient_id = %created_patient.id,
            created_by = %created_by,
            "Patient registered"
        );

        Ok(created_patient)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        self.repository.list_all().await
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Patient, PatientError> {
        self.load(id).await
    }

    async fn update_demographics(
        &self,
        id: &PatientId,
        command: UpdateDemographicsCommand,
    ) -> Result<Patient, PatientError> {
        let mut patient = self.load(id).await?;
        patient.apply_demographics(command, Utc::now());

        let updated_patient = self.repository.update(patient).await?;
        tracing::info!(patient_id = %updated_patient.id, "Patient demographics updated");

        Ok(updated_patient)
    }

    async fn update_clinical(
        &self,
        id: &PatientId,
        command: UpdateClinicalCommand,
    ) -> Result<Patient, PatientError> {
        let mut patient = self.load(id).await?;
        patient.apply_clinical(command, Utc::now());

        let updated_patient = self.repository.update(patient).await?;
        tracing::info!(patient_id = %updated_patient.id, "Patient clinical record updated");

        Ok(updated_patient)
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<(), PatientError> {
        self.repository.delete(id).await?;
        tracing::info!(patient_id = %id, "Patient deleted");

        Ok(())
    }
}
