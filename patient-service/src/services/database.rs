use crate::models::{Doctor, Patient, Survey, SurveyResult, User};
use crate::services::store::PatientStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::{CountOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for patient-service");

        // One patient record per user; every request resolves the caller through it
        let patient_user_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(
                IndexOptions::builder()
                    .name("patient_user_lookup".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.patients()
            .create_index(patient_user_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user index on patients collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on patients.user");

        let result_patient_index = IndexModel::builder()
            .keys(doc! { "patient": 1 })
            .options(
                IndexOptions::builder()
                    .name("survey_result_patient_lookup".to_string())
                    .build(),
            )
            .build();

        self.survey_results()
            .create_index(result_patient_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create patient index on surveyresults collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on surveyresults.patient");

        Ok(())
    }

    pub fn patients(&self) -> Collection<Patient> {
        self.db.collection("patients")
    }

    pub fn doctors(&self) -> Collection<Doctor> {
        self.db.collection("doctors")
    }

    pub fn surveys(&self) -> Collection<Survey> {
        self.db.collection("surveys")
    }

    pub fn survey_results(&self) -> Collection<SurveyResult> {
        self.db.collection("surveyresults")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl PatientStore for MongoDb {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn find_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, AppError> {
        Ok(self.patients().find_one(doc! { "user": user_id }, None).await?)
    }

    async fn find_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, AppError> {
        Ok(self.doctors().find_one(doc! { "_id": doctor_id }, None).await?)
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": user_id }, None).await?)
    }

    async fn survey_exists(&self, survey_id: &str) -> Result<bool, AppError> {
        let options = CountOptions::builder().limit(1).build();
        let count = self
            .surveys()
            .count_documents(doc! { "_id": survey_id }, options)
            .await?;
        Ok(count > 0)
    }

    async fn find_survey_results(&self, ids: &[String]) -> Result<Vec<SurveyResult>, AppError> {
        let mut cursor = self
            .survey_results()
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;

        let mut results = Vec::with_capacity(ids.len());
        while let Some(result) = cursor.try_next().await? {
            results.push(result);
        }
        Ok(results)
    }

    async fn find_survey_result(&self, id: &str) -> Result<Option<SurveyResult>, AppError> {
        Ok(self.survey_results().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_survey_result(&self, result: &SurveyResult) -> Result<(), AppError> {
        self.survey_results()
            .insert_one(result, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    survey_result_id = %result.id,
                    "Failed to insert survey result: {}",
                    e
                );
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn push_survey_result(
        &self,
        patient_id: &str,
        survey_result_id: &str,
    ) -> Result<(), AppError> {
        let now = bson::DateTime::from_chrono(chrono::Utc::now());
        let outcome = self
            .patients()
            .update_one(
                doc! { "_id": patient_id },
                doc! {
                    "$push": { "surveyResults": survey_result_id },
                    "$set": { "updatedAt": now },
                },
                None,
            )
            .await?;

        if outcome.matched_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Patient {} not found",
                patient_id
            )));
        }
        Ok(())
    }
}
