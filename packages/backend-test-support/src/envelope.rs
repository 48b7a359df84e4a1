//! Assertions over the `{success, data, error}` response envelope.
//!
//! Kept independent of backend types so both unit and integration tests can
//! use them.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde_json::Value;

/// Assert a success envelope with the given status and return its `data`.
pub async fn assert_success<B>(resp: ServiceResponse<B>, expected_status: StatusCode) -> Value
where
    B: MessageBody,
{
    let status = resp.status();
    let body: Value = actix_web::test::read_body_json(resp).await;

    assert_eq!(status, expected_status, "unexpected status, body: {body}");
    assert_eq!(body["success"], Value::Bool(true), "body: {body}");
    assert!(body.get("error").is_none(), "success must not carry error: {body}");

    body.get("data").cloned().unwrap_or(Value::Null)
}

/// Assert a failure envelope with the given status and exact message.
///
/// Failures rendered by the backend also carry an `x-trace-id` header.
pub async fn assert_failure<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_message: &str,
) where
    B: MessageBody,
{
    let status = resp.status();
    let has_trace_header = resp.headers().contains_key("x-trace-id");
    let body: Value = actix_web::test::read_body_json(resp).await;

    assert_eq!(status, expected_status, "unexpected status, body: {body}");
    assert_eq!(body["success"], Value::Bool(false), "body: {body}");
    assert!(body.get("data").is_none(), "failure must not carry data: {body}");
    assert_eq!(body["error"], Value::String(expected_message.to_string()));
    assert!(has_trace_header, "x-trace-id header should be present");
}
