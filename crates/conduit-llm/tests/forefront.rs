//! Integration tests for the ForefrontAI client.
//!
//! These tests run the client against a `wiremock` server that imitates the
//! hosted complete endpoint.

use std::time::Duration;

use conduit_llm::{
    ForefrontClient, ForefrontConfig, LanguageModel, LlmError, SamplingOverrides,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_env(_: &str) -> Option<String> {
    None
}

async fn client_for(server: &MockServer) -> ForefrontClient {
    let config = ForefrontConfig::new(format!("{}/complete", server.uri())).with_api_key("test-key");
    ForefrontClient::with_env(config, &no_env).unwrap()
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": [{ "completion": text }] }))
}

#[tokio::test]
async fn run_posts_prompt_with_auth_and_default_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/complete"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "text": "Tell me a joke.",
            "temperature": 0.7,
            "length": 256,
            "top_p": 1.0,
            "top_k": 40,
            "repetition_penalty": 1.0
        })))
        .respond_with(completion("Hello world, friend"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let text = client.run("Tell me a joke.", None).await.unwrap();
    assert_eq!(text, "Hello world, friend");
}

#[tokio::test]
async fn run_truncates_at_stop_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("Hello world, friend"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let stop = vec!["world".to_string()];
    let text = client.run("prompt", Some(&stop)).await.unwrap();
    assert_eq!(text, "Hello ");
}

#[tokio::test]
async fn run_with_sends_overridden_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "temperature": 0.2, "length": 16, "top_k": 40 })))
        .respond_with(completion("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let overrides = SamplingOverrides::default()
        .with_temperature(0.2)
        .with_length(16);
    let text = client.run_with("prompt", None, &overrides).await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn non_success_status_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.run("prompt", None).await.unwrap_err();
    match err {
        LlmError::Request { reason } => assert!(reason.contains("401")),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.run("prompt", None).await.unwrap_err();
    assert!(matches!(err, LlmError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("never"))
        .expect(0)
        .mount(&server)
        .await;

    let config = ForefrontConfig::new(format!("{}/complete", server.uri()));
    let err = ForefrontClient::with_env(config, &no_env).unwrap_err();
    assert!(err.is_config());
}

#[tokio::test]
async fn language_model_complete_delegates_to_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("a. b. c."))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let model: &dyn LanguageModel = &client;
    let stop = vec![". ".to_string()];
    assert_eq!(model.complete("x", Some(&stop)).await.unwrap(), "a");
}

#[tokio::test]
async fn slow_endpoint_is_a_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("too late").set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ForefrontConfig::new(format!("{}/complete", server.uri()))
        .with_api_key("test-key")
        .with_timeout(Duration::from_millis(50));
    let client = ForefrontClient::with_env(config, &no_env).unwrap();

    let err = client.run("prompt", None).await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout { .. }), "got {err:?}");
    assert!(!err.is_config());
}
