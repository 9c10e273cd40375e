use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use shared_config::AppConfig;

const MAX_CONNECTIONS: u32 = 10;

/// Upper bound on waiting for a connection from the pool. A saturated or
/// unreachable database turns into a store error instead of a hung request.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect(config: &AppConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    info!("Connected to Postgres");
    Ok(pool)
}
