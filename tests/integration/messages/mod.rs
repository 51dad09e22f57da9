//! Message handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{parse_body, request, TestApp};

#[tokio::test]
async fn test_add_message_returns_201() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(Some("user-123"), Default::default())
        .await
        .unwrap();

    let uri = format!(
        "/v1/conversations/{}/messages",
        conversation.conversation_id()
    );
    let req = request(
        Method::POST,
        &uri,
        Some("user-123"),
        Some(json!({"role": "user", "content": "Hello!"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = parse_body(resp).await;
    assert_eq!(body["role"], "user");
    assert_eq!(body["content"], "Hello!");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_add_message_persists_and_auto_titles() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(None, Default::default())
        .await
        .unwrap();
    let id = conversation.conversation_id();

    for (role, content) in [("user", "Hello!"), ("assistant", "Hi there!")] {
        let uri = format!("/v1/conversations/{id}/messages");
        let req = request(
            Method::POST,
            &uri,
            None,
            Some(json!({"role": role, "content": content})),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let loaded = app.vault.get_conversation(id).await.unwrap().unwrap();
    assert_eq!(loaded.title(), "Hello!");
    let history = loaded.get_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "Hi there!");
}

#[tokio::test]
async fn test_add_message_with_metadata() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(None, Default::default())
        .await
        .unwrap();

    let uri = format!(
        "/v1/conversations/{}/messages",
        conversation.conversation_id()
    );
    let req = request(
        Method::POST,
        &uri,
        None,
        Some(json!({
            "role": "assistant",
            "content": "Reply",
            "metadata": {"model": "some-model"}
        })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let loaded = app
        .vault
        .get_conversation(conversation.conversation_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        loaded.get_messages()[0].metadata.get("model"),
        Some(&json!("some-model"))
    );
}

#[tokio::test]
async fn test_add_message_unknown_role_rejected() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(None, Default::default())
        .await
        .unwrap();

    let uri = format!(
        "/v1/conversations/{}/messages",
        conversation.conversation_id()
    );
    let req = request(
        Method::POST,
        &uri,
        None,
        Some(json!({"role": "robot", "content": "beep"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_message_empty_content_rejected() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(None, Default::default())
        .await
        .unwrap();

    let uri = format!(
        "/v1/conversations/{}/messages",
        conversation.conversation_id()
    );
    let req = request(
        Method::POST,
        &uri,
        None,
        Some(json!({"role": "user", "content": ""})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_message_unknown_conversation_is_404() {
    let app = TestApp::new();

    let uri = format!("/v1/conversations/{}/messages", Uuid::new_v4());
    let req = request(
        Method::POST,
        &uri,
        None,
        Some(json!({"role": "user", "content": "Hello!"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_message_other_users_conversation_is_403() {
    let app = TestApp::new();

    let conversation = app
        .vault
        .create_conversation(Some("user-123"), Default::default())
        .await
        .unwrap();

    let uri = format!(
        "/v1/conversations/{}/messages",
        conversation.conversation_id()
    );
    let req = request(
        Method::POST,
        &uri,
        Some("user-456"),
        Some(json!({"role": "user", "content": "Hello!"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
