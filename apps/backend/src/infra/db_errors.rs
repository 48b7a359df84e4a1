//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert it into
//! `crate::errors::domain::DomainError` here, and handlers then map
//! `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const EMAIL_EXISTS: &str = "Email already exists";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract `table.column` from SQLite "UNIQUE constraint failed: table.column" messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = error_msg.find(MARKER)? + MARKER.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "users.email" | "customers.email" => Some((ConflictKind::UniqueEmail, EMAIL_EXISTS)),
        _ => None,
    }
}

fn map_postgres_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("ux_users_email") || error_msg.contains("ux_customers_email") {
        return Some((ConflictKind::UniqueEmail, EMAIL_EXISTS));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) | sea_orm::DbErr::RecordNotUpdated => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some(table_column) = extract_sqlite_table_column(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_table_column_to_conflict(table_column) {
                return DomainError::conflict(kind, detail);
            }
        }

        if let Some((kind, detail)) = map_postgres_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Resource already exists",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation("Referenced resource does not exist");
    }

    if mentions_sqlstate(&error_msg, "23514") || error_msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation("Value out of range");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    fn exec_err(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_string()))
    }

    #[test]
    fn sqlite_unique_email_maps_to_conflict() {
        for table in ["users", "customers"] {
            let err = exec_err(&format!(
                "error returned from database: (code: 2067) UNIQUE constraint failed: {table}.email"
            ));
            assert_eq!(
                map_db_err(err),
                DomainError::conflict(ConflictKind::UniqueEmail, "Email already exists")
            );
        }
    }

    #[test]
    fn postgres_unique_email_maps_to_conflict() {
        let err = exec_err(
            "error returned from database: duplicate key value violates unique constraint \"ux_customers_email\"",
        );
        assert_eq!(
            map_db_err(err),
            DomainError::conflict(ConflictKind::UniqueEmail, "Email already exists")
        );
    }

    #[test]
    fn unknown_unique_violation_is_generic_conflict() {
        let err = exec_err("UNIQUE constraint failed: other.col");
        assert!(matches!(
            map_db_err(err),
            DomainError::Conflict(ConflictKind::Other(_), _)
        ));
    }

    #[test]
    fn check_and_fk_violations_are_validation() {
        assert!(matches!(
            map_db_err(exec_err("CHECK constraint failed: quantity >= 1")),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            map_db_err(exec_err("FOREIGN KEY constraint failed")),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn unhandled_errors_do_not_leak_raw_text() {
        let mapped = map_db_err(exec_err("syntax error near SELECT secret_column"));
        match mapped {
            DomainError::Infra(_, detail) => {
                assert_eq!(detail, "Database operation failed");
            }
            other => panic!("expected infra error, got {other:?}"),
        }
    }

    #[test]
    fn connection_errors_are_db_unavailable() {
        let err = DbErr::Conn(RuntimeErr::Internal("connection refused".into()));
        assert!(matches!(
            map_db_err(err),
            DomainError::Infra(InfraErrorKind::DbUnavailable, _)
        ));
    }
}
