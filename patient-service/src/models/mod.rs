pub mod doctor;
pub mod patient;
pub mod survey;
pub mod survey_result;
pub mod user;

pub use doctor::Doctor;
pub use patient::Patient;
pub use survey::Survey;
pub use survey_result::SurveyResult;
pub use user::{User, UserRole};
