use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "patient-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "patient-service"
                })),
            )
        }
    }
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, MongoConfig, PatientConfig, StoreBackend};
    use crate::models::{Doctor, Patient, SurveyResult, User};
    use crate::services::{InMemoryStore, PatientStore};
    use async_trait::async_trait;
    use secrecy::Secret;
    use service_core::config::Config as CoreConfig;
    use service_core::error::AppError;
    use std::sync::Arc;

    /// Delegates to an in-memory store but fails every ping.
    struct UnreachableStore(InMemoryStore);

    #[async_trait]
    impl PatientStore for UnreachableStore {
        async fn health_check(&self) -> Result<(), AppError> {
            Err(AppError::DatabaseError(anyhow::anyhow!(
                "server selection timeout: mongo-primary.internal:27017"
            )))
        }

        async fn find_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, AppError> {
            self.0.find_patient_by_user(user_id).await
        }

        async fn find_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, AppError> {
            self.0.find_doctor(doctor_id).await
        }

        async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
            self.0.find_user(user_id).await
        }

        async fn survey_exists(&self, survey_id: &str) -> Result<bool, AppError> {
            self.0.survey_exists(survey_id).await
        }

        async fn find_survey_results(
            &self,
            ids: &[String],
        ) -> Result<Vec<SurveyResult>, AppError> {
            self.0.find_survey_results(ids).await
        }

        async fn find_survey_result(&self, id: &str) -> Result<Option<SurveyResult>, AppError> {
            self.0.find_survey_result(id).await
        }

        async fn insert_survey_result(&self, result: &SurveyResult) -> Result<(), AppError> {
            self.0.insert_survey_result(result).await
        }

        async fn push_survey_result(
            &self,
            patient_id: &str,
            survey_result_id: &str,
        ) -> Result<(), AppError> {
            self.0.push_survey_result(patient_id, survey_result_id).await
        }
    }

    fn state_with_unreachable_store() -> AppState {
        let config = PatientConfig {
            common: CoreConfig {
                port: 0,
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "patient_health_test".to_string(),
            },
            store: StoreBackend::Memory,
            auth: AuthConfig {
                jwt_secret: Secret::new("test-secret".to_string()),
            },
            api_version: "v1".to_string(),
        };
        AppState::new(config, Arc::new(UnreachableStore(InMemoryStore::new())))
    }

    #[tokio::test]
    async fn unhealthy_store_reports_status_without_error_text() {
        let response = health_check(State(state_with_unreachable_store()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "unhealthy");
        assert!(body.get("error").is_none());
        assert!(!body.to_string().contains("mongo-primary"));
    }

    #[tokio::test]
    async fn unhealthy_store_is_not_ready() {
        let response = readiness_check(State(state_with_unreachable_store()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
