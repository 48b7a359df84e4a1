use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::error::PayloadError;
use actix_web::{FromRequest, HttpRequest};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Request bodies above this size are rejected before parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body that has been deserialized and passed `validator` rules.
///
/// Parse failures become a sanitized 400; rule failures report the first
/// failing field (alphabetical) as `"<field> not valid"`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let body = read_body(&mut payload).await?;
            parse_validated(&body).map(ValidatedJson)
        })
    }
}

/// Collect a request body, rejecting anything over [`MAX_BODY_BYTES`].
pub async fn read_body<S>(payload: &mut S) -> Result<BytesMut, AppError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(trace_id = %trace_ctx::trace_id(), error = %e, "Failed to read request body chunk");
            AppError::bad_request("Failed to read request body")
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(AppError::bad_request("Request body too large"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Deserialize and validate a raw body. Shared with handlers that must do
/// work before looking at the body.
pub fn parse_validated<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let parsed = serde_json::from_slice::<T>(body).map_err(|e| {
        debug!(
            trace_id = %trace_ctx::trace_id(),
            error = %Redacted(&e.to_string()),
            body_size = body.len(),
            "JSON parsing failed"
        );
        AppError::bad_request(classify_json_error(&e))
    })?;

    parsed
        .validate()
        .map_err(|errors| AppError::invalid(format!("{} not valid", first_invalid_field(&errors))))?;

    Ok(parsed)
}

/// Field names come out of a map with no defined order; pick the smallest so
/// the reported field is stable across runs.
fn first_invalid_field(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .keys()
        .min()
        .map(|field| field.to_string())
        .unwrap_or_else(|| "request".to_string())
}

fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            let line = error.line();
            format!("Invalid JSON at line {line}")
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use actix_web::{web, App, HttpResponse};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn classify_syntax() {
        let err = serde_json::from_str::<serde_json::Value>(r#"{"a": }"#).unwrap_err();
        assert_eq!(classify_json_error(&err), "Invalid JSON at line 1");
    }

    #[test]
    fn classify_eof() {
        let err = serde_json::from_str::<serde_json::Value>(r#"{"a": 1"#).unwrap_err();
        assert!(classify_json_error(&err).contains("unexpected end of input"));
    }

    #[test]
    fn classify_wrong_types() {
        let err = serde_json::from_str::<Signup>(r#"{"email": 1, "password": 2}"#).unwrap_err();
        assert!(classify_json_error(&err).contains("wrong types"));
    }

    #[test]
    fn reports_first_field_alphabetically() {
        let err = parse_validated::<Signup>(br#"{"email": "nope", "password": "short"}"#)
            .unwrap_err();
        assert_eq!(err.message(), "email not valid");

        let err = parse_validated::<Signup>(br#"{"email": "u@x.com", "password": "short"}"#)
            .unwrap_err();
        assert_eq!(err.message(), "password not valid");
    }

    #[test]
    fn valid_body_passes() {
        let ok = parse_validated::<Signup>(br#"{"email": "u@x.com", "password": "password1"}"#)
            .unwrap();
        assert_eq!(ok.email, "u@x.com");
    }

    async fn handler(body: ValidatedJson<Signup>) -> HttpResponse {
        HttpResponse::Ok().body(body.into_inner().email)
    }

    #[actix_web::test]
    async fn extractor_renders_envelope_on_failure() {
        let app = actix_test::init_service(App::new().route("/", web::post().to(handler))).await;

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[actix_web::test]
    async fn read_body_enforces_cap() {
        let small = vec![b'a'; 16];
        let mut stream = futures_util::stream::iter(vec![Ok::<_, PayloadError>(Bytes::from(small))]);
        assert_eq!(read_body(&mut stream).await.unwrap().len(), 16);

        let chunk = Bytes::from(vec![b'a'; MAX_BODY_BYTES / 2 + 1]);
        let mut stream = futures_util::stream::iter(vec![
            Ok::<_, PayloadError>(chunk.clone()),
            Ok(chunk),
        ]);
        let err = read_body(&mut stream).await.unwrap_err();
        assert_eq!(err.message(), "Request body too large");
        assert_eq!(err.status().as_u16(), 400);
    }
}
