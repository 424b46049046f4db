//! PostgreSQL pool setup.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Pool options shared by eager and lazy pools. Waiting for a connection is
/// bounded by the statement timeout.
fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.statement_timeout)
}

/// Connect to PostgreSQL, failing fast when the database is unreachable.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    pool_options(config)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")
}

/// A pool that opens connections on first use. Used when queries are only
/// rendered, never run.
pub fn lazy_pool(config: &Config) -> Result<PgPool> {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")
}
