//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, participant list).

use std::time::Duration;

mod fixtures;
use fixtures::{TestClient, TestServer};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_participants_endpoint_empty() {
    // テスト項目: 参加者がいないとき /api/participants は空配列を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: serde_json::Value = reqwest::get(format!("{}/api/participants", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_participants_endpoint_lists_in_id_order() {
    // テスト項目: /api/participants が ID 順に参加者と接続状態を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let (_bob, _) = TestClient::identify(&server.ws_url(), "bob-token").await;

    // when (操作):
    let body: serde_json::Value = reqwest::get(format!("{}/api/participants", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    let participants = body.as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["userId"], 1);
    assert_eq!(participants[0]["color"], "#FF6B6B");
    assert_eq!(participants[0]["online"], true);
    assert!(participants[0]["createdAt"].is_string());
    assert_eq!(participants[1]["userId"], 2);

    // 切断すると offline になるが、一覧からは消えない
    alice.close().await;
    let mut offline = false;
    for _ in 0..20 {
        let body: serde_json::Value =
            reqwest::get(format!("{}/api/participants", server.base_url()))
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
        let participants = body.as_array().unwrap();
        assert_eq!(participants.len(), 2);
        if participants[0]["online"] == false {
            offline = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(offline, "participant 1 should go offline after closing");
}
