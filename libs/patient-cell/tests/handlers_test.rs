use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use patient_cell::router::patient_routes;
use shared_utils::test_utils::{test_state, TestConfig};

fn create_test_app() -> Router {
    patient_routes(test_state(TestConfig::default().to_app_config()))
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_reports_every_violation_in_one_response() {
    let app = create_test_app();

    // Missing breed and owner phone, invalid gender, impossible weight.
    let body = json!({
        "name": "Rex",
        "birthDate": "2020-06-01T00:00:00Z",
        "gender": "unknown",
        "weight": 450.0,
        "ownerName": "Jane Doe"
    });

    let response = app.oneshot(json_request("POST", "/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Validation failed");

    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"breed"));
    assert!(fields.contains(&"gender"));
    assert!(fields.contains(&"weight"));
    assert!(fields.contains(&"ownerPhone"));
}

#[tokio::test]
async fn update_rejects_an_empty_body() {
    let app = create_test_app();

    let uri = format!("/{}", uuid::Uuid::new_v4());
    let response = app
        .oneshot(json_request("PUT", &uri, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["details"][0]["field"], "body");
}

#[tokio::test]
async fn update_bounds_medical_notes() {
    let app = create_test_app();

    let uri = format!("/{}", uuid::Uuid::new_v4());
    let body = json!({ "medicalNotes": "x".repeat(501) });

    let response = app.oneshot(json_request("PUT", &uri, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["details"][0]["field"], "medicalNotes");
}
