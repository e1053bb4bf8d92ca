//! Process-local `PatientStore` for development and tests.

use crate::models::{Doctor, Patient, Survey, SurveyResult, User};
use crate::services::store::PatientStore;
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    patients: HashMap<String, Patient>,
    doctors: HashMap<String, Doctor>,
    surveys: HashMap<String, Survey>,
    users: HashMap<String, User>,
    // Insertion order stands in for Mongo's natural order.
    survey_results: Vec<SurveyResult>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_patient(&self, patient: Patient) {
        let mut inner = self.inner.write().await;
        inner.patients.insert(patient.id.clone(), patient);
    }

    pub async fn insert_doctor(&self, doctor: Doctor) {
        let mut inner = self.inner.write().await;
        inner.doctors.insert(doctor.id.clone(), doctor);
    }

    pub async fn insert_survey(&self, survey: Survey) {
        let mut inner = self.inner.write().await;
        inner.surveys.insert(survey.id.clone(), survey);
    }

    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id.clone(), user);
    }

    pub async fn patient(&self, patient_id: &str) -> Option<Patient> {
        self.inner.read().await.patients.get(patient_id).cloned()
    }

    pub async fn survey_result_count(&self) -> usize {
        self.inner.read().await.survey_results.len()
    }
}

#[async_trait]
impl PatientStore for InMemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.patients.values().find(|p| p.user == user_id).cloned())
    }

    async fn find_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, AppError> {
        Ok(self.inner.read().await.doctors.get(doctor_id).cloned())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }

    async fn survey_exists(&self, survey_id: &str) -> Result<bool, AppError> {
        Ok(self.inner.read().await.surveys.contains_key(survey_id))
    }

    async fn find_survey_results(&self, ids: &[String]) -> Result<Vec<SurveyResult>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .survey_results
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn find_survey_result(&self, id: &str) -> Result<Option<SurveyResult>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.survey_results.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_survey_result(&self, result: &SurveyResult) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        if inner.survey_results.iter().any(|r| r.id == result.id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "Duplicate survey result id {}",
                result.id
            )));
        }
        inner.survey_results.push(result.clone());
        Ok(())
    }

    async fn push_survey_result(
        &self,
        patient_id: &str,
        survey_result_id: &str,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let patient = inner.patients.get_mut(patient_id).ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Patient {} not found", patient_id))
        })?;
        patient.survey_results.push(survey_result_id.to_string());
        patient.updated_at = chrono::Utc::now();
        Ok(())
    }
}
