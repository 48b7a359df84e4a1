use actix_web::error::{PathError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AccessGuard;
use crate::services::ListParams;

pub mod auth;
pub mod customers;
pub mod health;
pub mod orders;

/// Register every route, the protected scopes, and the extractor error
/// handlers. Used by `main.rs` and by integration tests so both see the same
/// surface.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    // Health check: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /api/auth/** (no bearer required)
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Customer routes: /api/customers/**
    cfg.service(
        web::scope("/api/customers")
            .wrap(AccessGuard)
            .configure(customers::configure_routes),
    );

    // Order routes: /api/orders/**
    cfg.service(
        web::scope("/api/orders")
            .wrap(AccessGuard)
            .configure(orders::configure_routes),
    );
}

fn query_error(_err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("query not valid").into()
}

// Every path parameter in this API is a numeric `id`.
fn path_error(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("id not valid").into()
}

/// `?page=&limit=&search=` as received. Numbers are parsed here so a bad
/// value can be reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn into_params(self) -> Result<ListParams, AppError> {
        let page = parse_number("page", self.page)?;
        let limit = parse_number("limit", self.limit)?;
        Ok(ListParams::new(page, limit, self.search))
    }
}

fn parse_number(name: &str, raw: Option<String>) -> Result<Option<u64>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("{name} not valid"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let params = ListQuery::default().into_params().unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn list_query_parses_and_normalizes() {
        let params = ListQuery {
            page: Some("3".into()),
            limit: Some("500".into()),
            search: Some("  ALICE ".into()),
        }
        .into_params()
        .unwrap();
        assert_eq!((params.page, params.limit), (3, 100));
        assert_eq!(params.search(), Some("alice"));
    }

    #[test]
    fn list_query_names_bad_number() {
        let err = ListQuery {
            limit: Some("ten".into()),
            ..Default::default()
        }
        .into_params()
        .unwrap_err();
        assert_eq!(err.message(), "limit not valid");

        let err = ListQuery {
            page: Some("-1".into()),
            ..Default::default()
        }
        .into_params()
        .unwrap_err();
        assert_eq!(err.message(), "page not valid");
    }
}
