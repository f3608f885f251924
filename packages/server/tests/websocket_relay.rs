//! WebSocket relay integration tests.
//!
//! Covers identification, roster replay, signal fan-out and reconnection.

mod fixtures;
use fixtures::{TestClient, TestServer};

#[tokio::test]
async fn test_first_identify_receives_init() {
    // テスト項目: 最初の参加者は ID 1 とパレット先頭の色を受け取る
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (mut alice, init) = TestClient::identify(&server.ws_url(), "alice-token").await;

    // then (期待する結果):
    assert_eq!(init["userId"], 1);
    assert_eq!(init["color"], "#FF6B6B");
    // 名簿は空なので追加のメッセージは無い
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_second_participant_gets_roster_and_first_is_notified() {
    // テスト項目: 新しい参加者は既存の名簿を受け取り、既存の参加者には userJoined が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;

    // when (操作):
    let (mut bob, init) = TestClient::identify(&server.ws_url(), "bob-token").await;

    // then (期待する結果):
    assert_eq!(init["userId"], 2);
    assert_eq!(init["color"], "#4ECDC4");

    let replay = bob.recv_json().await;
    assert_eq!(replay["type"], "userJoined");
    assert_eq!(replay["userId"], 1);
    assert_eq!(replay["color"], "#FF6B6B");

    let joined = alice.recv_json().await;
    assert_eq!(joined["type"], "userJoined");
    assert_eq!(joined["userId"], 2);
    assert_eq!(joined["color"], "#4ECDC4");
}

#[tokio::test]
async fn test_morse_is_relayed_to_others_only() {
    // テスト項目: 信号は送信者以外に届き、送信者にはエコーされない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let (mut bob, _) = TestClient::identify(&server.ws_url(), "bob-token").await;
    let _ = bob.recv_json().await; // replay of alice
    let _ = alice.recv_json().await; // bob joined

    // when (操作):
    alice.send_morse(true).await;
    alice.send_morse(false).await;

    // then (期待する結果):
    let press = bob.recv_json().await;
    assert_eq!(press["type"], "morse");
    assert_eq!(press["userId"], 1);
    assert_eq!(press["state"], true);
    assert!(press["timestamp"].as_i64().unwrap() > 0);

    let release = bob.recv_json().await;
    assert_eq!(release["state"], false);
    assert!(release["timestamp"].as_i64().unwrap() >= press["timestamp"].as_i64().unwrap());

    alice.expect_silence().await;
}

#[tokio::test]
async fn test_reconnect_keeps_identity_and_is_quiet() {
    // テスト項目: 同じトークンで再接続すると ID と色が維持され、他の参加者に通知されない
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let (mut bob, _) = TestClient::identify(&server.ws_url(), "bob-token").await;
    let _ = bob.recv_json().await;
    alice.close().await;

    // when (操作):
    let (mut alice_again, init) = TestClient::identify(&server.ws_url(), "alice-token").await;

    // then (期待する結果):
    assert_eq!(init["userId"], 1);
    assert_eq!(init["color"], "#FF6B6B");
    let replay = alice_again.recv_json().await;
    assert_eq!(replay["type"], "userJoined");
    assert_eq!(replay["userId"], 2);

    bob.expect_silence().await;
}

#[tokio::test]
async fn test_new_connection_supersedes_old_one() {
    // テスト項目: 同じ参加者の新しい接続だけが以後の信号を受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice_old, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let (mut bob, _) = TestClient::identify(&server.ws_url(), "bob-token").await;
    let _ = bob.recv_json().await;
    let _ = alice_old.recv_json().await;

    // when (操作): 古い接続を閉じずに再識別
    let (mut alice_new, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let _ = alice_new.recv_json().await;
    bob.send_morse(true).await;

    // then (期待する結果):
    let press = alice_new.recv_json().await;
    assert_eq!(press["type"], "morse");
    assert_eq!(press["userId"], 2);
    alice_old.expect_silence().await;
}

#[tokio::test]
async fn test_morse_before_identify_is_ignored() {
    // テスト項目: 未識別の接続からの信号は中継されない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;
    let mut anonymous = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    anonymous.send_morse(true).await;

    // then (期待する結果):
    alice.expect_silence().await;
    anonymous.expect_silence().await;
}

#[tokio::test]
async fn test_malformed_message_keeps_connection_open() {
    // テスト項目: 不正なメッセージは破棄され、接続はそのまま使える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    client.send_text("not json at all").await;
    client.send_text(r#"{"type":"shout","volume":11}"#).await;
    client
        .send_json(serde_json::json!({"type": "identify", "uuid": "alice-token"}))
        .await;

    // then (期待する結果):
    let init = client.recv_json().await;
    assert_eq!(init["type"], "init");
    assert_eq!(init["userId"], 1);
}

#[tokio::test]
async fn test_empty_token_is_rejected() {
    // テスト項目: 空のトークンでは識別されず、後から正しいトークンで識別できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    client
        .send_json(serde_json::json!({"type": "identify", "uuid": ""}))
        .await;

    // then (期待する結果):
    client.expect_silence().await;
    client
        .send_json(serde_json::json!({"type": "identify", "uuid": "alice-token"}))
        .await;
    let init = client.recv_json().await;
    assert_eq!(init["userId"], 1);
}

#[tokio::test]
async fn test_second_identify_on_same_connection_is_ignored() {
    // テスト項目: 識別済みの接続で再度 identify しても別の参加者にはならない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, _) = TestClient::identify(&server.ws_url(), "alice-token").await;

    // when (操作):
    alice
        .send_json(serde_json::json!({"type": "identify", "uuid": "mallory-token"}))
        .await;

    // then (期待する結果):
    alice.expect_silence().await;
    let (_, init) = TestClient::identify(&server.ws_url(), "bob-token").await;
    assert_eq!(init["userId"], 2);
}
