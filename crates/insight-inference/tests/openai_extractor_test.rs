//! Integration tests for the OpenAI-compatible extractor against a mock server.

use insight_core::{Error, TaskExtractor};
use insight_inference::openai::{OpenAIConfig, OpenAIExtractor};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn extractor_for(server: &MockServer) -> OpenAIExtractor {
    OpenAIExtractor::new(OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    })
    .expect("Failed to create extractor")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_request_shape_and_bare_array_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "temperature": 0.0,
            "max_tokens": 1500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"[{"id": "t1", "description": "Draft plan", "priority": "high", "dependencies": [], "status": "ready"}]"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = extractor_for(&server)
        .extract_tasks("Alice drafts the plan.")
        .await
        .expect("extraction should succeed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].0["id"], "t1");
}

#[tokio::test]
async fn test_prose_wrapped_reply_is_recovered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Sure! Here you go:\n```json\n[{\"id\": \"a\"}, {\"id\": \"b\"}]\n```",
        )))
        .mount(&server)
        .await;

    let tasks = extractor_for(&server).extract_tasks("x").await.unwrap();
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn test_unparseable_reply_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "I'm sorry, I can't find any tasks in this transcript.",
        )))
        .mount(&server)
        .await;

    let tasks = extractor_for(&server).extract_tasks("x").await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let tasks = extractor_for(&server).extract_tasks("x").await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_legacy_text_field_is_used() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "{\"tasks\": [{\"id\": \"legacy\"}]}" }]
        })))
        .mount(&server)
        .await;

    let tasks = extractor_for(&server).extract_tasks("x").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].0["id"], "legacy");
}

#[tokio::test]
async fn test_server_error_is_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "message": "overloaded", "type": "server_error" }
        })))
        .mount(&server)
        .await;

    let err = extractor_for(&server).extract_tasks("x").await.unwrap_err();
    match err {
        Error::Inference(msg) => assert!(msg.contains("overloaded"), "{}", msg),
        other => panic!("Expected Inference error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_credentials_are_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = extractor_for(&server).extract_tasks("x").await.unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_error() {
    let extractor = OpenAIExtractor::new(OpenAIConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("k".to_string()),
        timeout_seconds: 2,
        ..Default::default()
    })
    .unwrap();

    let err = extractor.extract_tasks("x").await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}
