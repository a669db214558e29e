//! Postgres wiring: connection pool and schema.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

use crate::config::ServiceConfig;
use crate::error::{ResolveError, map_sqlx_error};

/// Tables, `authorizations_view` and the permission seed.
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_authorization_schema.sql");

/// Connect a pool sized from `config`. `None` when no database is configured.
#[instrument(skip(config), err)]
pub async fn connect(config: &ServiceConfig) -> Result<Option<PgPool>, ResolveError> {
    let Some(url) = config.database_url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    info!(max_connections = config.database_max_connections, "connected to postgres");
    Ok(Some(pool))
}

/// Apply [`SCHEMA_SQL`]. Idempotent.
#[instrument(skip(pool), err)]
pub async fn apply_schema(pool: &PgPool) -> Result<(), ResolveError> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("apply_schema", e))?;
    Ok(())
}
