pub mod doctor;
pub mod survey_result;

pub use doctor::{DoctorResponse, UserResponse};
pub use survey_result::{SubmitSurveyResultRequest, SurveyResultResponse};
