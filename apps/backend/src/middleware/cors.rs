use std::env;

use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Parse `CORS_ALLOWED_ORIGINS` (comma separated). Empty, `null` and
/// non-http(s) entries are dropped; an empty result falls back to the local
/// dev origins.
pub fn allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

/// CORS restricted to the configured origins and the methods the API serves.
pub fn cors_middleware() -> Cors {
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in allowed_origins(&raw) {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::allowed_origins;

    #[test]
    fn filters_and_normalizes() {
        assert_eq!(
            allowed_origins(" https://app.example.com/ , null, ftp://x, ,http://localhost:5173"),
            vec!["https://app.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn falls_back_to_dev_origins() {
        assert_eq!(
            allowed_origins(""),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }
}
