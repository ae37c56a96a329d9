//! Telegram Bot API contract tests against a mock server.

use futures::StreamExt;
use rollcall_channels::{TelegramChannel, TelegramConfig};
use rollcall_core::error::RollCallError;
use rollcall_core::traits::NotificationSink;
use rollcall_core::types::{ChatId, OutgoingMessage, ParticipantId};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel(server: &MockServer) -> TelegramChannel {
    TelegramChannel::new(TelegramConfig::new("TOKEN").with_base_url(server.uri()))
}

#[tokio::test]
async fn test_send_plain_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .and(body_partial_json(json!({"chat_id": 42, "text": "Good morning!"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = channel(&server)
        .send(OutgoingMessage::new(ChatId(42), "Good morning!"))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_reply_carries_reply_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .and(body_partial_json(json!({
            "chat_id": -100,
            "reply_parameters": {"message_id": 77}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let message = OutgoingMessage {
        chat_id: ChatId(-100),
        text: "Report received ✅".into(),
        reply_to: Some(77),
    };
    assert!(channel(&server).send(message).await.is_ok());
}

#[tokio::test]
async fn test_api_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = channel(&server)
        .send(OutgoingMessage::new(ChatId(1), "hi"))
        .await
        .unwrap_err();
    match err {
        RollCallError::Transport(msg) => assert!(msg.contains("chat not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_me() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/botTOKEN/getMe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"id": 9, "is_bot": true, "first_name": "RollCall", "username": "rollcall_bot"}
        })))
        .mount(&server)
        .await;

    let me = channel(&server).get_me().await.unwrap();
    assert_eq!(me.username.as_deref(), Some("rollcall_bot"));
}

#[tokio::test]
async fn test_get_updates_passes_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/botTOKEN/getUpdates"))
        .and(query_param("offset", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [{
                "update_id": 5,
                "message": {
                    "message_id": 1,
                    "from": {"id": 111, "is_bot": false, "first_name": "Ivan"},
                    "chat": {"id": -100, "type": "group"},
                    "text": "#report",
                    "date": 1_700_000_000
                }
            }]
        })))
        .mount(&server)
        .await;

    let updates = channel(&server).get_updates(5).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 5);
}

#[tokio::test]
async fn test_polling_stream_yields_messages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/botTOKEN/getUpdates"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [{
                "update_id": 1,
                "message": {
                    "message_id": 3,
                    "from": {"id": 222, "is_bot": false, "first_name": "Petya"},
                    "chat": {"id": -100, "type": "group"},
                    "text": "today #report",
                    "date": 1_700_000_000
                }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/botTOKEN/getUpdates"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})))
        .mount(&server)
        .await;

    let mut stream = channel(&server).start_polling();
    let msg = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("poll timed out")
        .expect("stream ended");
    assert_eq!(msg.sender_id, ParticipantId(222));
    assert_eq!(msg.text, "today #report");
}
