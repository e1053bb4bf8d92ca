//! Patient-facing routes under `/api/{version}/patient`.

use crate::dtos::{DoctorResponse, SubmitSurveyResultRequest, SurveyResultResponse};
use crate::error_messages::ErrorMessage;
use crate::middleware::AuthUser;
use crate::models::{Patient, SurveyResult};
use crate::services::{metrics::record_survey_result_submitted, PatientStore};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!(ErrorMessage::NotFound))
}

fn required_parameter() -> AppError {
    AppError::BadRequest(anyhow::anyhow!(ErrorMessage::RequiredParameter))
}

/// Resolves the caller's patient record.
async fn find_patient(store: &dyn PatientStore, user_id: &str) -> Result<Patient, AppError> {
    store.find_patient_by_user(user_id).await?.ok_or_else(|| {
        tracing::warn!(user_id = %user_id, "No patient record for user");
        not_found()
    })
}

/// `GET /patient/doctor`: the caller's doctor with the doctor's user profile
/// nested under `user`.
pub async fn get_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let patient = find_patient(store, &auth.user_id).await?;

    let doctor_id = patient.doctor.as_deref().ok_or_else(|| {
        tracing::info!(patient_id = %patient.id, "Patient has no assigned doctor");
        not_found()
    })?;

    let doctor = store.find_doctor(doctor_id).await?.ok_or_else(|| {
        tracing::warn!(patient_id = %patient.id, doctor_id = %doctor_id, "Assigned doctor missing");
        not_found()
    })?;

    let doctor_user = store.find_user(&doctor.user).await?.ok_or_else(|| {
        tracing::warn!(doctor_id = %doctor.id, user_id = %doctor.user, "Doctor profile missing");
        not_found()
    })?;

    Ok(Json(DoctorResponse::new(doctor, doctor_user)))
}

/// `GET /patient/surveys`
pub async fn get_survey_result_list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let patient = find_patient(store, &auth.user_id).await?;

    let results: Vec<SurveyResultResponse> = store
        .find_survey_results(&patient.survey_results)
        .await?
        .into_iter()
        .map(SurveyResultResponse::from)
        .collect();

    Ok(Json(results))
}

/// `GET /patient/surveys/:id`
///
/// Ownership is decided by the patient's own result list only.
pub async fn get_survey_result_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(survey_result_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let patient = find_patient(store, &auth.user_id).await?;

    if !patient.owns_survey_result(&survey_result_id) {
        return Err(not_found());
    }

    let result = store
        .find_survey_result(&survey_result_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                patient_id = %patient.id,
                survey_result_id = %survey_result_id,
                "Listed survey result no longer exists"
            );
            not_found()
        })?;

    Ok(Json(SurveyResultResponse::from(result)))
}

/// `POST /patient/surveys`
pub async fn post_survey_result(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<SubmitSurveyResultRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Unreadable survey submission");
        required_parameter()
    })?;
    let (survey_id, answers) = payload.into_parts().ok_or_else(required_parameter)?;

    let store = state.store.as_ref();
    if !store.survey_exists(&survey_id).await? {
        return Err(not_found());
    }

    let patient = find_patient(store, &auth.user_id).await?;

    let result = SurveyResult::new(patient.id.clone(), survey_id, answers);
    store.insert_survey_result(&result).await?;

    // No transaction spans the two writes; a failure here orphans the result.
    if let Err(e) = store.push_survey_result(&patient.id, &result.id).await {
        tracing::error!(
            patient_id = %patient.id,
            survey_result_id = %result.id,
            "Stored survey result but failed to link it to the patient: {}",
            e
        );
        return Err(e);
    }

    record_survey_result_submitted();
    tracing::info!(
        patient_id = %patient.id,
        survey_result_id = %result.id,
        survey_id = %result.survey,
        "Survey result submitted"
    );

    Ok(StatusCode::OK)
}
