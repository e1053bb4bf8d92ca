#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use patient_service::config::{AuthConfig, MongoConfig, PatientConfig, StoreBackend};
use patient_service::models::{Doctor, Patient, Survey, SurveyResult, User, UserRole};
use patient_service::services::{InMemoryStore, JwtService};
use patient_service::startup::{build_router, AppState};
use secrecy::Secret;
use serde_json::{json, Map, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

pub fn test_config() -> PatientConfig {
    PatientConfig {
        common: CoreConfig {
            port: 0,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: format!("patient_test_{}", Uuid::new_v4()),
        },
        store: StoreBackend::Memory,
        auth: AuthConfig {
            jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
        },
        api_version: "v1".to_string(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = test_config();
        let store = InMemoryStore::new();
        let jwt = JwtService::new(&config.auth);
        let router = build_router(AppState::new(config, Arc::new(store.clone())));

        TestApp { router, store, jwt }
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt
            .generate_access_token(user_id, Duration::minutes(15))
            .expect("Failed to sign test token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Body>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let has_body = body.is_some();
        if has_body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// GET with a verbatim `Authorization` header value.
    pub async fn request_with_authorization(&self, uri: &str, authorization: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let raw = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();
        let body = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_json(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(
            Method::POST,
            uri,
            Some(token),
            Some(Body::from(body.to_string())),
        )
        .await
    }
}

/// A patient with an assigned doctor and one available survey.
pub struct Fixture {
    pub patient_user: User,
    pub patient: Patient,
    pub doctor_user: User,
    pub doctor: Doctor,
    pub survey: Survey,
}

pub fn user(role: UserRole, first_name: &str) -> User {
    User::new(
        format!("{}@example.com", first_name.to_lowercase()),
        first_name.to_string(),
        "Tester".to_string(),
        role,
    )
}

pub async fn seed(store: &InMemoryStore) -> Fixture {
    let doctor_user = user(UserRole::Doctor, "Gregory");
    let mut doctor = Doctor::new(doctor_user.id.clone(), Some("Cardiology".to_string()));
    doctor.phone = Some("+1-555-0100".to_string());

    let patient_user = user(UserRole::Patient, "Alice");
    let patient = Patient::new(patient_user.id.clone(), Some(doctor.id.clone()));

    let survey = Survey::new(
        "Weekly wellbeing".to_string(),
        json!({ "questions": [{ "id": "q1", "type": "scale" }] }),
    );

    store.insert_user(doctor_user.clone()).await;
    store.insert_doctor(doctor.clone()).await;
    store.insert_user(patient_user.clone()).await;
    store.insert_patient(patient.clone()).await;
    store.insert_survey(survey.clone()).await;

    Fixture {
        patient_user,
        patient,
        doctor_user,
        doctor,
        survey,
    }
}

/// Stores a result for `patient` and links it to the patient's list.
pub async fn seed_result(store: &InMemoryStore, patient: &Patient, survey: &Survey) -> SurveyResult {
    use patient_service::services::PatientStore;

    let answers: Map<String, Value> = json!({ "q1": 4 }).as_object().cloned().unwrap_or_default();
    let result = SurveyResult::new(patient.id.clone(), survey.id.clone(), answers);
    store
        .insert_survey_result(&result)
        .await
        .expect("Failed to insert survey result");
    store
        .push_survey_result(&patient.id, &result.id)
        .await
        .expect("Failed to link survey result");
    result
}
