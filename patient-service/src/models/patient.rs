use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    /// Id of the User this patient record belongs to.
    pub user: String,
    /// Assigned doctor, if any.
    #[serde(default)]
    pub doctor: Option<String>,
    /// SurveyResult ids, oldest first.
    #[serde(default)]
    pub survey_results: Vec<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(user: String, doctor: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            doctor,
            survey_results: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owns_survey_result(&self, survey_result_id: &str) -> bool {
        self.survey_results.iter().any(|id| id == survey_result_id)
    }
}
