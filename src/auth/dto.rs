use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::validate::ValidationErrors;
use crate::users::model::User;

/// Request body for sign-up. Fields are optional so the validator can
/// report missing ones per field instead of failing the whole bind.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusError {
    pub success: bool,
    pub error: &'static str,
}

/// Validation failure body: overall message plus per-field errors.
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    pub success: bool,
    pub message: &'static str,
    pub errors: ValidationErrors,
}

/// Successful login body; the token also travels in the cookie.
#[derive(Debug, Serialize)]
pub struct TokenGrant {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
}

/// Redacted view of an authenticated user.
#[derive(Debug, Serialize)]
pub struct UserProjection {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for UserProjection {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserProjection,
}
