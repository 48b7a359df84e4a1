use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Default)]
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    db_kind: Option<DbKind>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    /// Fails if no security config was supplied; there is no fallback secret.
    pub async fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("security configuration is required"))?;

        match self.db_kind {
            // single entrypoint: connect + migrate
            Some(kind) => Ok(AppState::new(bootstrap_db(kind).await?, security)),
            None => Ok(AppState::without_db(security)),
        }
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_succeeds_without_db_option() {
        let state = build_state()
            .with_security(SecurityConfig::new(b"k".to_vec()))
            .build()
            .await
            .unwrap();
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn test_build_requires_security() {
        let err = build_state().build().await.unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[tokio::test]
    async fn test_build_with_sqlite_memory() {
        let state = build_state()
            .with_db(DbKind::SqliteMemory)
            .with_security(SecurityConfig::new(b"k".to_vec()))
            .build()
            .await
            .unwrap();
        assert!(state.db().is_some());
    }
}
