pub mod health;
pub mod patient;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use patient::{get_doctor, get_survey_result_by_id, get_survey_result_list, post_survey_result};
