use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::prime_dummy_hash;
use crate::auth::repo::{MemoryUserRepository, PgUserRepository, UserRepository};
use crate::classes::repo::{ClassRepository, MemoryClassRepository, PgClassRepository};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub classes: Arc<dyn ClassRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Connects to Postgres and applies migrations, or falls back to the
    /// in-memory store when no `DATABASE_URL` is configured. Also builds the
    /// dummy password hash used for unknown-email logins.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        prime_dummy_hash().await?;

        let Some(url) = config.database_url.clone() else {
            warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
            return Ok(Self::in_memory(config));
        };

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database connected and migrated");

        Ok(Self::from_parts(
            config,
            Arc::new(PgClassRepository::new(db.clone())),
            Arc::new(PgUserRepository::new(db)),
        ))
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryClassRepository::default()),
            Arc::new(MemoryUserRepository::default()),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        classes: Arc<dyn ClassRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            config,
            jwt,
            classes,
            users,
        }
    }
}
