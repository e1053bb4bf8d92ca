use crate::models::{Doctor, User, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// The doctor's own fields with the `user` reference replaced by the profile.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub user: UserResponse,
}

impl DoctorResponse {
    pub fn new(doctor: Doctor, user: User) -> Self {
        Self {
            id: doctor.id,
            specialty: doctor.specialty,
            phone: doctor.phone,
            created_at: doctor.created_at.to_rfc3339(),
            updated_at: doctor.updated_at.to_rfc3339(),
            user: UserResponse::from(user),
        }
    }
}
