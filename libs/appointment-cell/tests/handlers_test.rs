use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{test_state, TestConfig};

fn create_test_app() -> Router {
    appointment_routes(test_state(TestConfig::default().to_app_config()))
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_reports_every_violation_in_one_response() {
    let app = create_test_app();

    // Three independent violations: out-of-range duration, bad email,
    // missing service name.
    let body = json!({
        "customerName": "Jane Doe",
        "customerEmail": "not-an-email",
        "startTime": "2025-01-10T10:00:00Z",
        "endTime": "2025-01-10T10:30:00Z",
        "durationMinutes": 1000,
        "status": "confirmed"
    });

    let response = app.oneshot(post_json("/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Validation failed");

    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"durationMinutes"));
    assert!(fields.contains(&"customerEmail"));
    assert!(fields.contains(&"serviceName"));
}

#[tokio::test]
async fn create_rejects_unknown_status() {
    let app = create_test_app();

    let body = json!({
        "customerName": "Jane Doe",
        "serviceName": "Checkup",
        "startTime": "2025-01-10T10:00:00Z",
        "endTime": "2025-01-10T10:30:00Z",
        "durationMinutes": 30,
        "status": "no-show"
    });

    let response = app.oneshot(post_json("/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["status"]);
}

#[tokio::test]
async fn update_rejects_an_empty_body() {
    let app = create_test_app();

    let uri = format!("/{}", uuid::Uuid::new_v4());
    let response = app.oneshot(put_json(&uri, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["details"][0]["field"], "body");
}

#[tokio::test]
async fn update_rejects_inconsistent_duration() {
    let app = create_test_app();

    let uri = format!("/{}", uuid::Uuid::new_v4());
    let body = json!({
        "startTime": "2025-01-10T10:00:00Z",
        "endTime": "2025-01-10T10:30:00Z",
        "durationMinutes": 45
    });

    let response = app.oneshot(put_json(&uri, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["details"][0]["field"], "durationMinutes");
}

#[tokio::test]
async fn get_with_a_malformed_id_is_a_client_error() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
