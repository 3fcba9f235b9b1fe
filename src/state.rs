use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::token::TokenCodec;
use crate::config::AppConfig;
use crate::users::repo::{PgUserStore, UserStore};

/// Composition-root state, constructed once and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub codec: TokenCodec,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.db_string)
            .await
            .context("connect to database")?;
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        Ok(Self::from_parts(db, config, users))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> Self {
        let codec = TokenCodec::new(&config.jwt_secret);
        Self {
            db,
            config,
            users,
            codec,
        }
    }
}
