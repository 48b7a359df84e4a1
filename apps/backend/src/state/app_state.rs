use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Shared, read-only request context: the pooled store handle and the signing config.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent only in tests that never touch the store)
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    pub fn without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
