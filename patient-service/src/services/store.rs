use crate::models::{Doctor, Patient, SurveyResult, User};
use async_trait::async_trait;
use service_core::error::AppError;

/// Document-store operations used by the patient handlers.
///
/// Lookups return `Ok(None)` for a missing document; `Err` is reserved for
/// store failures.
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    async fn find_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, AppError>;
    async fn find_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, AppError>;
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn survey_exists(&self, survey_id: &str) -> Result<bool, AppError>;

    /// Results whose id is in `ids`, in store order.
    async fn find_survey_results(&self, ids: &[String]) -> Result<Vec<SurveyResult>, AppError>;
    async fn find_survey_result(&self, id: &str) -> Result<Option<SurveyResult>, AppError>;
    async fn insert_survey_result(&self, result: &SurveyResult) -> Result<(), AppError>;

    /// Appends `survey_result_id` to the patient's result list as a single
    /// store-level operation, so concurrent appends are never lost.
    async fn push_survey_result(
        &self,
        patient_id: &str,
        survey_result_id: &str,
    ) -> Result<(), AppError>;
}
