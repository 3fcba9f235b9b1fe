use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};

/// Attempts after which the account is locked.
const MAX_LOGIN_ATTEMPTS: i32 = 5;
const LOCKOUT_DURATION: Duration = Duration::minutes(15);

/// User record in the database.
///
/// Only `id`, `email`, `password_hash`, `name`, `role` and `created_at`
/// participate in the authentication flow; the remaining profile and
/// account-security columns are persisted with their defaults and carried
/// through reads untouched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    pub email_verified_at: Option<OffsetDateTime>,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<OffsetDateTime>,
    pub is_active: bool,
    pub login_attempts: i32,
    pub locked_until: Option<OffsetDateTime>,
    pub last_login_at: Option<OffsetDateTime>,
    pub last_login_ip: String,
    pub two_factor_enabled: bool,
    pub two_factor_secret: String,
    pub refresh_token: String,
    pub refresh_token_exp: Option<OffsetDateTime>,
    pub avatar: String,
    pub phone_number: String,
    pub role: String,
    pub last_password_change: Option<OffsetDateTime>,
    pub created_by_ip: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Display name: "first last" when both parts are present, else `name`.
    pub fn full_name(&self) -> String {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            self.name.clone()
        }
    }

    pub fn is_account_locked(&self) -> bool {
        self.locked_until
            .is_some_and(|until| until > OffsetDateTime::now_utc())
    }

    /// Counts a failed login; locks the account for 15 minutes once the
    /// attempt limit is reached.
    pub fn increment_login_attempts(&mut self) {
        self.login_attempts += 1;
        if self.login_attempts >= MAX_LOGIN_ATTEMPTS {
            self.locked_until = Some(OffsetDateTime::now_utc() + LOCKOUT_DURATION);
        }
    }

    pub fn reset_login_attempts(&mut self) {
        self.login_attempts = 0;
        self.locked_until = None;
        self.last_login_at = Some(OffsetDateTime::now_utc());
    }
}
