//! Integration tests for the newsletter API.
//!
//! Email dispatch is disabled (no Resend configuration), so confirmation
//! tokens are read straight from the subscribers file, which is exactly
//! where the server persists them before any email goes out.

use axum::http::StatusCode;
use serde_json::{Value, json};
use tower::ServiceExt;

use footballdecoded_integration_tests::{TestApp, response_json};

fn read_subscribers(app: &TestApp) -> Value {
    let raw = std::fs::read_to_string(app.subscribers_path())
        .expect("subscribers file should exist after a subscribe");
    serde_json::from_str(&raw).expect("subscribers file should be valid JSON")
}

async fn subscribe(app: &TestApp, email: &str) -> (StatusCode, Value) {
    let response = app
        .router()
        .oneshot(TestApp::post_json(
            "/api/newsletter/subscribe",
            &json!({"email": email}),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

#[tokio::test]
async fn missing_email_is_rejected() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(TestApp::post_json("/api/newsletter/subscribe", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::new();

    let (status, body) = subscribe(&app, "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");
}

#[tokio::test]
async fn new_subscriber_is_persisted_as_pending() {
    let app = TestApp::new();

    let (status, body) = subscribe(&app, "reader@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "reader@example.com");

    let subscribers = read_subscribers(&app);
    assert_eq!(subscribers.as_array().unwrap().len(), 1);
    assert_eq!(subscribers[0]["email"], "reader@example.com");
    assert_eq!(subscribers[0]["confirmed"], false);
    assert_eq!(
        subscribers[0]["confirmationToken"].as_str().unwrap().len(),
        64
    );
}

#[tokio::test]
async fn email_is_normalized_to_lowercase() {
    let app = TestApp::new();

    let (status, body) = subscribe(&app, "  Reader@Example.COM ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "reader@example.com");

    let subscribers = read_subscribers(&app);
    assert_eq!(subscribers[0]["email"], "reader@example.com");
}

#[tokio::test]
async fn resubscribe_keeps_the_existing_token() {
    let app = TestApp::new();

    subscribe(&app, "reader@example.com").await;
    let token_before = read_subscribers(&app)[0]["confirmationToken"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = subscribe(&app, "READER@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("re-sent"));

    let subscribers = read_subscribers(&app);
    assert_eq!(subscribers.as_array().unwrap().len(), 1);
    assert_eq!(subscribers[0]["confirmationToken"], token_before.as_str());
}

#[tokio::test]
async fn confirm_flips_the_record_and_clears_the_token() {
    let app = TestApp::new();

    subscribe(&app, "reader@example.com").await;
    let token = read_subscribers(&app)[0]["confirmationToken"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .router()
        .oneshot(TestApp::get(&format!(
            "/api/newsletter/confirm?token={token}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["email"], "reader@example.com");

    let subscribers = read_subscribers(&app);
    assert_eq!(subscribers[0]["confirmed"], true);
    assert!(subscribers[0].get("confirmationToken").is_none());
    assert!(subscribers[0]["confirmedAt"].is_string());
}

#[tokio::test]
async fn confirmation_token_is_single_use() {
    let app = TestApp::new();

    subscribe(&app, "reader@example.com").await;
    let token = read_subscribers(&app)[0]["confirmationToken"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/newsletter/confirm?token={token}");

    let response = app.router().oneshot(TestApp::get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router().oneshot(TestApp::get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn confirm_without_token_is_rejected() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(TestApp::get("/api/newsletter/confirm"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router()
        .oneshot(TestApp::get("/api/newsletter/confirm?token="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn confirm_with_unknown_token_is_not_found() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(TestApp::get(&format!(
            "/api/newsletter/confirm?token={}",
            "0".repeat(64)
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subscribing_a_confirmed_address_is_idempotent() {
    let app = TestApp::new();

    subscribe(&app, "reader@example.com").await;
    let token = read_subscribers(&app)[0]["confirmationToken"]
        .as_str()
        .unwrap()
        .to_string();

    app.router()
        .oneshot(TestApp::get(&format!(
            "/api/newsletter/confirm?token={token}"
        )))
        .await
        .unwrap();

    let (status, body) = subscribe(&app, "reader@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("already subscribed")
    );

    let subscribers = read_subscribers(&app);
    assert_eq!(subscribers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn stats_reflect_the_subscriber_list() {
    let app = TestApp::new();

    subscribe(&app, "a@example.com").await;
    subscribe(&app, "b@example.com").await;
    let token = read_subscribers(&app)[0]["confirmationToken"]
        .as_str()
        .unwrap()
        .to_string();

    app.router()
        .oneshot(TestApp::get(&format!(
            "/api/newsletter/confirm?token={token}"
        )))
        .await
        .unwrap();

    let response = app
        .router()
        .oneshot(TestApp::get("/api/newsletter/subscribe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["confirmed"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["recentCount"], 1);
    assert_eq!(body["latest"].as_array().unwrap().len(), 1);
    assert_eq!(body["latest"][0]["email"], "a@example.com");
}

#[tokio::test]
async fn stats_on_empty_store() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(TestApp::get("/api/newsletter/subscribe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["confirmed"], 0);
    assert_eq!(body["pending"], 0);
    assert_eq!(body["latest"], json!([]));
}
