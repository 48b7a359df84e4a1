use dbo_backend::config::db::DbKind;
use dbo_backend::infra::state::build_state;
use dbo_backend::state::app_state::AppState;
use dbo_backend::state::security_config::SecurityConfig;
use dbo_backend::AppError;

pub const TEST_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET)
}

/// Fresh in-memory SQLite with migrations applied. Each call is an isolated
/// database.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_db(DbKind::SqliteMemory)
        .with_security(test_security())
        .build()
        .await
}
