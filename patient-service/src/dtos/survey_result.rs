use crate::models::SurveyResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResultResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient: String,
    pub survey: String,
    pub answers: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SurveyResult> for SurveyResultResponse {
    fn from(result: SurveyResult) -> Self {
        Self {
            id: result.id,
            patient: result.patient,
            survey: result.survey,
            answers: result.answers,
            created_at: result.created_at.to_rfc3339(),
            updated_at: result.updated_at.to_rfc3339(),
        }
    }
}

/// Body of `POST /patient/surveys`.
///
/// Both fields are optional at the serde level so that a missing field
/// surfaces as a 400 "required parameter" rather than a JSON rejection.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSurveyResultRequest {
    #[validate(required, length(min = 1))]
    pub survey_id: Option<String>,
    #[validate(required)]
    pub answers: Option<Value>,
}

impl SubmitSurveyResultRequest {
    /// Returns the survey id and answer map once both are present, the
    /// answers are a JSON object and every value in them can be stored.
    pub fn into_parts(self) -> Option<(String, Map<String, Value>)> {
        if self.validate().is_err() {
            return None;
        }
        match (self.survey_id, self.answers) {
            (Some(survey_id), Some(Value::Object(answers)))
                if answers.values().all(is_storable) =>
            {
                Some((survey_id, answers))
            }
            _ => None,
        }
    }
}

/// BSON has no unsigned integer type, so integers above `i64::MAX` can't be
/// written.
fn is_storable(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_f64(),
        Value::Array(items) => items.iter().all(is_storable),
        Value::Object(fields) => fields.values().all(is_storable),
        Value::Null | Value::Bool(_) | Value::String(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> SubmitSurveyResultRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_survey_id_and_object_answers() {
        let (survey_id, answers) = parse(json!({ "surveyId": "s-1", "answers": { "q1": 2 } }))
            .into_parts()
            .unwrap();

        assert_eq!(survey_id, "s-1");
        assert_eq!(answers["q1"], json!(2));
    }

    #[test]
    fn empty_answer_object_is_accepted() {
        assert!(parse(json!({ "surveyId": "s-1", "answers": {} }))
            .into_parts()
            .is_some());
    }

    #[test]
    fn rejects_missing_or_empty_fields() {
        assert!(parse(json!({ "answers": { "q1": 1 } })).into_parts().is_none());
        assert!(parse(json!({ "surveyId": "", "answers": { "q1": 1 } }))
            .into_parts()
            .is_none());
        assert!(parse(json!({ "surveyId": "s-1" })).into_parts().is_none());
        assert!(parse(json!({ "surveyId": "s-1", "answers": null }))
            .into_parts()
            .is_none());
    }

    #[test]
    fn rejects_integers_outside_bson_range() {
        assert!(parse(json!({ "surveyId": "s-1", "answers": { "q1": u64::MAX } }))
            .into_parts()
            .is_none());
        assert!(parse(json!({
            "surveyId": "s-1",
            "answers": { "q1": { "nested": [1, 9_223_372_036_854_775_808u64] } }
        }))
        .into_parts()
        .is_none());
    }

    #[test]
    fn accepted_answers_serialize_to_bson() {
        let (survey_id, answers) = parse(json!({
            "surveyId": "s-1",
            "answers": { "q1": i64::MAX, "q2": -4, "q3": 2.5, "q4": [{ "x": null }] }
        }))
        .into_parts()
        .unwrap();

        let result = SurveyResult::new("patient-1".to_string(), survey_id, answers);
        assert!(mongodb::bson::to_document(&result).is_ok());
    }

    #[test]
    fn rejects_non_object_answers() {
        assert!(parse(json!({ "surveyId": "s-1", "answers": [1, 2] }))
            .into_parts()
            .is_none());
        assert!(parse(json!({ "surveyId": "s-1", "answers": "yes" }))
            .into_parts()
            .is_none());
    }
}
