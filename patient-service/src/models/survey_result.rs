use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One patient's answers to one survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient: String,
    pub survey: String,
    /// Answers keyed by question id.
    pub answers: Map<String, Value>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl SurveyResult {
    pub fn new(patient: String, survey: String, answers: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            patient,
            survey,
            answers,
            created_at: now,
            updated_at: now,
        }
    }
}
