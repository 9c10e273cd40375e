use assert_matches::assert_matches;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::services::sync::{SesamiSyncClient, SyncAction, SyncError};
use shared_utils::test_utils::TestConfig;

#[tokio::test]
async fn notify_posts_the_booking_change() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/bookings/sync"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(serde_json::json!({
            "booking_id": "bk_42",
            "action": "update"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::default()
        .with_sesami_api(&format!("{}/v1/bookings/sync", mock_server.uri()), "test-api-key")
        .to_app_config();

    let client = SesamiSyncClient::new(&config);
    client.notify("bk_42", SyncAction::Update).await.unwrap();
}

#[tokio::test]
async fn notify_reports_server_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = TestConfig::default()
        .with_sesami_api(&mock_server.uri(), "test-api-key")
        .to_app_config();

    let client = SesamiSyncClient::new(&config);
    let err = client.notify("bk_42", SyncAction::Cancel).await.unwrap_err();
    assert_matches!(err, SyncError::HttpStatus(500));
}

#[tokio::test]
async fn notify_is_a_no_op_when_unconfigured() {
    let config = TestConfig::default().to_app_config();
    let client = SesamiSyncClient::new(&config);
    assert!(!client.is_configured());

    // No server anywhere; an unconfigured client must not try to reach one.
    client.notify("bk_42", SyncAction::Update).await.unwrap();
}
