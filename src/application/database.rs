//! Persistence adapter
//!
//! Owns the PostgreSQL pool, the raw parameterized query entry point and the
//! idle-connection cleanup issued once at boot.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    FromQueryResult, Statement, Value,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::migrations::Migrator;

pub type DbConn = DatabaseConnection;

/// Result of a raw statement run through [`query`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<JsonValue>,
    /// `id` column of the first returned row, when the statement returns one
    pub insert_id: Option<i64>,
}

/// Create a new database connection and run migrations using config
pub async fn connect() -> Result<DbConn> {
    connect_with_url(&CONFIG.database.database_url).await
}

/// Create a new database connection with a specific URL, clear idle backends and run migrations
pub async fn connect_with_url(database_url: &str) -> Result<DbConn> {
    tracing::info!("Connecting to database...");

    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(CONFIG.database.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))?;

    match clear_idle_connections(&db).await {
        Ok(0) => tracing::debug!("No idle database connections to clear"),
        Ok(count) => tracing::info!(count, "Cleared idle database connections"),
        Err(e) => tracing::warn!(error = %e, "Idle connection cleanup failed, continuing"),
    }

    tracing::info!("Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run migrations: {}", e)))?;
    tracing::info!("Database migrations completed");

    Ok(db)
}

/// Run one parameterized statement and return its rows.
///
/// Placeholders follow the backend (`$1` on PostgreSQL, `?` on SQLite).
/// Database errors are returned as-is; nothing is retried.
pub async fn query<C, I>(db: &C, sql: &str, params: I) -> Result<QueryOutput>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Value>,
{
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, params);
    let results = db.query_all(stmt).await?;

    let rows = results
        .iter()
        .map(|row| JsonValue::from_query_result(row, ""))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let insert_id = rows
        .first()
        .and_then(|row| row.get("id"))
        .and_then(JsonValue::as_i64);

    Ok(QueryOutput { rows, insert_id })
}

/// Terminate idle backends on the current database, excluding our own session.
///
/// Advisory housekeeping: `pg_terminate_backend` on an already-gone pid is
/// harmless, so concurrent boots may race on this. Non-PostgreSQL backends are
/// left alone.
pub async fn clear_idle_connections<C: ConnectionTrait>(db: &C) -> Result<u64> {
    if db.get_database_backend() != DatabaseBackend::Postgres {
        return Ok(0);
    }

    let output = query(
        db,
        r#"
        SELECT pg_terminate_backend(pid) AS terminated
        FROM pg_stat_activity
        WHERE datname = current_database()
          AND pid <> pg_backend_pid()
          AND state = 'idle'
        "#,
        Vec::<Value>::new(),
    )
    .await?;

    let terminated = output
        .rows
        .iter()
        .filter(|row| row.get("terminated").and_then(JsonValue::as_bool) == Some(true))
        .count();

    Ok(terminated as u64)
}
