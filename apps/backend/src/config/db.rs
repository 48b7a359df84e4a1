use std::env;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::AppError;

/// Which store the application talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// Postgres configured from `DB_*` environment variables
    Postgres,
    /// Private in-memory SQLite database (tests)
    SqliteMemory,
}

/// Everything except RFC 3986 unreserved characters is escaped.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Connection URL for the given store.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => postgres_url(),
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Builds a Postgres URL from `DB_HOST`, `DB_PORT`, `DB_USERNAME`, `DB_PASSWORD` and `DB_NAME`.
fn postgres_url() -> Result<String, AppError> {
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = port()?;
    let username = must_var("DB_USERNAME")?;
    let password = must_var("DB_PASSWORD")?;
    let db_name = must_var("DB_NAME")?;

    let username = utf8_percent_encode(&username, URL_COMPONENT);
    let password = utf8_percent_encode(&password, URL_COMPONENT);
    let db_name = utf8_percent_encode(&db_name, URL_COMPONENT);

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn port() -> Result<u16, AppError> {
    match env::var("DB_PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("DB_PORT must be a valid port, got '{raw}'"))),
        Err(_) => Ok(5432),
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
