use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;

use crate::users::model::User;

/// Role given to accounts that were created without one.
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Fields supplied when creating an account. Everything else in the row
/// takes its schema default.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Persistence seam for user records. Injected into the service and guard
/// so nothing in the auth flow touches a process-wide handle.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Reads mirror the create-time hook: an empty role column comes back as
/// the default role.
fn with_default_role(mut user: User) -> User {
    if user.role.is_empty() {
        user.role = DEFAULT_ROLE.to_string();
    }
    user
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                first_name, last_name, name, email, password_hash,
                last_login_ip, two_factor_secret, refresh_token,
                avatar, phone_number, role, created_by_ip
            )
            VALUES ('', '', '', $1, $2, '', '', '', '', '', $3, '')
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(DEFAULT_ROLE)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    warn!(email = %new.email, "duplicate email on insert");
                    return StoreError::Conflict;
                }
            }
            StoreError::Database(e)
        })?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(with_default_role))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(with_default_role))
    }
}
