use super::*;
use crate::routes::app;
use crate::routes::tests::{read_json, test_app_state};
use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;

fn payload(name: &str, email: &str, message: &str) -> ContactPayload {
    ContactPayload {
        name: Some(Value::from(name)),
        email: Some(Value::from(email)),
        message: Some(Value::from(message)),
        honeypot: None,
    }
}

async fn post_contact(body: &str) -> (StatusCode, serde_json::Value) {
    let response = app(test_app_state())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

// =============================================================
// validate
// =============================================================

#[test]
fn validate_accepts_complete_form() {
    let result = validate(payload("Ada", "ada@example.com", "Hello")).unwrap();
    assert_eq!(
        result,
        Submission::Accepted(ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello".into(),
        })
    );
}

#[test]
fn validate_rejects_missing_or_empty_fields() {
    let mut p = payload("Ada", "ada@example.com", "Hello");
    p.name = None;
    assert_eq!(validate(p), Err(ContactError::MissingFields));

    assert_eq!(validate(payload("Ada", "", "Hello")), Err(ContactError::MissingFields));
    assert_eq!(validate(payload("Ada", "ada@example.com", "")), Err(ContactError::MissingFields));
    assert_eq!(validate(ContactPayload::default()), Err(ContactError::MissingFields));
}

#[test]
fn validate_leaves_email_shape_to_the_form() {
    let result = validate(payload("Ada", "ada.example.com", "Hello")).unwrap();
    assert!(matches!(result, Submission::Accepted(form) if form.email == "ada.example.com"));
}

#[test]
fn validate_accepts_truthy_non_string_fields() {
    let p = ContactPayload {
        name: Some(json!(1)),
        email: Some(json!(true)),
        message: Some(json!({ "text": "hi" })),
        honeypot: None,
    };
    let Ok(Submission::Accepted(form)) = validate(p) else {
        panic!("truthy fields should be accepted");
    };
    assert_eq!(form.name, "1");
    assert_eq!(form.email, "true");
}

#[test]
fn validate_falsy_non_string_fields_are_missing() {
    let mut p = payload("Ada", "ada@example.com", "Hello");
    p.name = Some(json!(0));
    assert_eq!(validate(p), Err(ContactError::MissingFields));

    let mut p = payload("Ada", "ada@example.com", "Hello");
    p.message = Some(Value::Null);
    assert_eq!(validate(p), Err(ContactError::MissingFields));
}

#[test]
fn validate_honeypot_is_spam_even_when_incomplete() {
    let p = ContactPayload { honeypot: Some(json!("http://spam.test")), ..ContactPayload::default() };
    assert_eq!(validate(p), Ok(Submission::Spam));
}

#[test]
fn validate_empty_honeypot_is_ignored() {
    let mut p = payload("Ada", "ada@example.com", "Hello");
    p.honeypot = Some(json!(""));
    assert!(matches!(validate(p), Ok(Submission::Accepted(_))));
}

#[test]
fn from_value_reads_object_fields() {
    let p = ContactPayload::from_value(json!({ "name": "Ada", "website": "x", "extra": 1 })).unwrap();
    assert_eq!(p.name, Some(json!("Ada")));
    assert_eq!(p.honeypot, Some(json!("x")));
    assert_eq!(p.email, None);
}

#[test]
fn from_value_non_object_has_no_fields() {
    assert_eq!(ContactPayload::from_value(json!([1, 2, 3])).unwrap(), ContactPayload::default());
    assert_eq!(ContactPayload::from_value(json!("text")).unwrap(), ContactPayload::default());
    assert_eq!(ContactPayload::from_value(Value::Null), Err(ContactError::Malformed));
}

#[test]
fn contact_error_statuses() {
    assert_eq!(ContactError::MissingFields.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ContactError::Malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================
// POST /api/contact
// =============================================================

#[tokio::test]
async fn post_contact_success() {
    let (status, body) = post_contact(r#"{"name":"Ada","email":"ada@example.com","message":"Hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message received successfully");
}

#[tokio::test]
async fn post_contact_missing_field_is_400() {
    let (status, body) = post_contact(r#"{"name":"Ada","email":"ada@example.com"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn post_contact_numeric_field_is_accepted() {
    let (status, body) = post_contact(r#"{"name":1,"email":"nope","message":"Hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn post_contact_null_body_is_500() {
    let (status, body) = post_contact("null").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process request");
}

#[tokio::test]
async fn post_contact_array_body_is_400() {
    let (status, body) = post_contact(r#"["Ada","ada@example.com","Hi"]"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn post_contact_invalid_json_is_500() {
    let (status, body) = post_contact("{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process request");
}

#[tokio::test]
async fn post_contact_website_field_acts_as_honeypot() {
    let (status, body) = post_contact(r#"{"website":"http://spam.test"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
