use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Long enough that the pool never drops the in-memory connection (and with
/// it the database) during a process lifetime.
const SQLITE_MEMORY_CONN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Open a pooled connection. Does NOT run any migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(db_url(kind)?);
    options
        .sqlx_logging(false)
        .connect_timeout(Duration::from_secs(10));

    // Every pooled connection to `sqlite::memory:` is a separate database,
    // so the pool is pinned to a single connection that is never recycled.
    if kind == DbKind::SqliteMemory {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(SQLITE_MEMORY_CONN_LIFETIME)
            .max_lifetime(SQLITE_MEMORY_CONN_LIFETIME);
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migrations failed: {e}")))?;

    info!(db = ?kind, "database ready");
    Ok(conn)
}

/// Centralized helper to access the database connection from AppState.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}
