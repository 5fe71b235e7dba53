//! Connection pool setup and schema maintenance.

use std::collections::HashSet;
use std::time::Duration;

use kinews_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::DbError;

// Relative to crates/kinews-db/Cargo.toml.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Pool sizing and the time a caller may wait for a free connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 10,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }

    fn options(self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

/// Open a pool against `database_url`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    config.options().connect(database_url).await
}

/// Open a pool with the URL and sizing from the app config.
///
/// # Errors
///
/// Returns [`DbError::MissingDatabaseUrl`] without touching the network when
/// no URL is configured, or [`DbError::Sqlx`] if connecting fails.
pub async fn connect_pool_from_config(config: &AppConfig) -> Result<PgPool, DbError> {
    let Some(database_url) = config.database_url.as_deref() else {
        return Err(DbError::MissingDatabaseUrl);
    };
    let pool = connect_pool(database_url, PoolConfig::from_app_config(config)).await?;
    Ok(pool)
}

/// Apply the workspace migrations and return how many were new.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails or an applied one
/// was edited afterwards.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    let applied = applied_versions(pool).await;
    MIGRATOR.run(pool).await?;
    Ok(MIGRATOR
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .count())
}

/// Versions recorded as applied. Empty on a fresh database, where the
/// bookkeeping table does not exist yet.
async fn applied_versions(pool: &PgPool) -> HashSet<i64> {
    sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
        .fetch_all(pool)
        .await
        .map(|versions| versions.into_iter().collect())
        .unwrap_or_default()
}

/// Round-trip a trivial query to prove the pool can serve connections.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
