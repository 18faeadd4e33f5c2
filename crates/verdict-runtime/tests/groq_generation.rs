//! End-to-end generation against a mocked Groq endpoint.

use std::sync::Arc;
use std::time::Duration;

use verdict_core::{select_fallback, DecisionType, VerdictRequest};
use verdict_runtime::providers::GroqProvider;
use verdict_runtime::{CompletionConfig, VerdictGenerator, VerdictSource};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "llama-3.1-8b-instant",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 310, "completion_tokens": 28, "total_tokens": 338}
    })
}

fn generator_for(server: &MockServer) -> VerdictGenerator {
    let provider = GroqProvider::new("gsk_test").with_base_url(format!("{}/openai/v1", server.uri()));
    VerdictGenerator::builder()
        .provider(Arc::new(provider))
        .completion(CompletionConfig {
            timeout: Duration::from_secs(5),
            ..CompletionConfig::default()
        })
        .build()
}

#[tokio::test]
async fn accepted_completion_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(bearer_token("gsk_test"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 400,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"verdict": "NO", "justification": "You're reacting to boredom, not readiness."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let request = VerdictRequest::new(DecisionType::YesNo, "Should I quit my job today?").unwrap();
    let generated = generator_for(&server).generate(&request).await;

    assert_eq!(generated.source, VerdictSource::Ai);
    assert_eq!(generated.verdict.verdict, "NO");
    assert_eq!(
        generated.verdict.justification,
        "You're reacting to boredom, not readiness."
    );
}

#[tokio::test]
async fn server_error_falls_back_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"message": "internal error", "type": "server_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = VerdictRequest::new(DecisionType::ThisThat, "Laptop or desktop").unwrap();
    let generated = generator_for(&server).generate(&request).await;

    assert_eq!(generated.source, VerdictSource::Fallback);
    assert_eq!(
        generated.verdict,
        select_fallback(DecisionType::ThisThat, "Laptop or desktop")
    );
    assert!(generated.fallback_reason.unwrap().contains("internal error"));
}

#[tokio::test]
async fn rate_limit_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let request = VerdictRequest::new(DecisionType::NowLater, "Buy the house").unwrap();
    let generated = generator_for(&server).generate(&request).await;
    assert_eq!(generated.source, VerdictSource::Fallback);
    assert!(generated.verdict.is_allowed_for(DecisionType::NowLater));
}

#[tokio::test]
async fn short_completion_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("YES")))
        .mount(&server)
        .await;

    let request = VerdictRequest::new(DecisionType::YesNo, "Text them").unwrap();
    let generated = generator_for(&server).generate(&request).await;
    assert_eq!(generated.source, VerdictSource::Fallback);
    assert!(generated.fallback_reason.unwrap().contains("too short"));
}
