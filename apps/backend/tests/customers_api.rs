mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_failure, assert_success};
use backend_test_support::unique_helpers::{unique_email, unique_phone};
use serde_json::{json, Value};
use support::auth::signed_in_user;
use support::{build_test_state, create_test_app};

fn customer_body(name: &str, email: &str, gender: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone_number": unique_phone(),
        "gender": gender,
    })
}

#[actix_web::test]
async fn customer_crud_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;
    let user = signed_in_user(&app).await;

    let email = unique_email("alice");
    let req = test::TestRequest::post()
        .uri("/api/customers")
        .insert_header(("Authorization", user.bearer()))
        .set_json(customer_body("Alice", &email, "Female"))
        .to_request();
    let created = assert_success(test::call_service(&app, req).await, StatusCode::CREATED).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["gender"], "female");
    assert_eq!(created["email"], email.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers/{id}"))
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    let fetched = assert_success(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(fetched["name"], "Alice");

    let req = test::TestRequest::put()
        .uri(&format!("/api/customers/{id}"))
        .insert_header(("Authorization", user.bearer()))
        .set_json(json!({ "name": "Alice B", "phone_number": "5550001111", "gender": "female" }))
        .to_request();
    let updated = assert_success(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["name"], "Alice B");
    assert_eq!(updated["phone_number"], "5550001111");
    assert_eq!(updated["email"], email.as_str());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/customers/{id}"))
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    let data = assert_success(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data, "Customer deleted successfully");

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers/{id}"))
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    assert_failure(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "Customer not found",
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn customer_validation_errors() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;
    let user = signed_in_user(&app).await;

    let email = unique_email("dup");
    let req = test::TestRequest::post()
        .uri("/api/customers")
        .insert_header(("Authorization", user.bearer()))
        .set_json(customer_body("Dup", &email, "male"))
        .to_request();
    assert_success(test::call_service(&app, req).await, StatusCode::CREATED).await;

    let cases = [
        (customer_body("Dup", &email, "male"), "Email already exists"),
        (customer_body("Robo", &unique_email("robo"), "robot"), "Invalid gender"),
        (customer_body("", &unique_email("blank"), "male"), "name not valid"),
        (
            json!({ "name": "Short", "email": unique_email("p"), "phone_number": "123", "gender": "male" }),
            "phone_number not valid",
        ),
        (customer_body("Bad", "not-an-email", "male"), "email not valid"),
    ];

    for (body, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/customers")
            .insert_header(("Authorization", user.bearer()))
            .set_json(body)
            .to_request();
        assert_failure(test::call_service(&app, req).await, StatusCode::BAD_REQUEST, message).await;
    }

    let req = test::TestRequest::put()
        .uri("/api/customers/999999")
        .insert_header(("Authorization", user.bearer()))
        .set_json(json!({ "name": "Nobody", "phone_number": "5550001111", "gender": "male" }))
        .to_request();
    assert_failure(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "Customer not found",
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/customers/abc")
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    assert_failure(test::call_service(&app, req).await, StatusCode::BAD_REQUEST, "id not valid").await;

    Ok(())
}

#[actix_web::test]
async fn customer_search_and_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;
    let user = signed_in_user(&app).await;

    for name in ["Zelda Quest", "Zora Quest", "Mario Kart"] {
        let req = test::TestRequest::post()
            .uri("/api/customers")
            .insert_header(("Authorization", user.bearer()))
            .set_json(customer_body(name, &unique_email("c"), "male"))
            .to_request();
        assert_success(test::call_service(&app, req).await, StatusCode::CREATED).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/customers?search=QUEST&limit=1&page=2")
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    let data = assert_success(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["count"], 2);
    let page = data["customers"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "Zora Quest");

    let req = test::TestRequest::get()
        .uri("/api/customers")
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    let data = assert_success(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["count"], 3);
    assert_eq!(data["customers"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/customers?page=first")
        .insert_header(("Authorization", user.bearer()))
        .to_request();
    assert_failure(test::call_service(&app, req).await, StatusCode::BAD_REQUEST, "page not valid").await;

    Ok(())
}
