//! Wire-level tests for the streaming completion client.

use futures::StreamExt;
use provisional_ai::{LlmError, Message, OpenAiClient, POET_SYSTEM_PROMPT, build_request};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let event = serde_json::json!({
            "choices": [{ "index": 0, "delta": { "content": fragment } }]
        });
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

async fn collect(client: &OpenAiClient, messages: Vec<Message>) -> Vec<Result<String, LlmError>> {
    client.complete_stream(messages).collect().await
}

#[tokio::test]
async fn forwards_fragments_in_arrival_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["The \u{e9}tude", "\nrevises", " itself"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let items = collect(&client, vec![Message::user("write a poem")]).await;

    let fragments: Vec<String> = items.into_iter().map(|i| i.unwrap()).collect();
    assert_eq!(fragments, vec!["The \u{e9}tude", "\nrevises", " itself"]);
}

#[tokio::test]
async fn sends_system_prompt_and_fixed_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(&["ok"]), "text/event-stream"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let messages = build_request(&[Message::user("begin mid-thought")]);
    let _ = collect(&client, messages).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], POET_SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["stream"], true);
    assert_eq!(body["max_tokens"], 300);
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["presence_penalty"], 0.4);
    assert_eq!(body["frequency_penalty"], 0.3);
}

#[tokio::test]
async fn upstream_429_surfaces_as_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let items = collect(&client, vec![Message::user("hi")]).await;

    assert_eq!(items.len(), 1);
    match &items[0] {
        Err(LlmError::RateLimited { retry_after_secs }) => {
            assert_eq!(*retry_after_secs, Some(30));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failure_surfaces_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let items = collect(&client, vec![Message::user("hi")]).await;

    assert_eq!(items.len(), 1);
    match &items[0] {
        Err(LlmError::Api { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "internal");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unterminated_final_event_is_recovered() {
    let server = MockServer::start().await;
    // Last event lacks its trailing blank line.
    let body = format!(
        "{}data: {}",
        sse_body(&["first"]),
        serde_json::json!({ "choices": [{ "index": 0, "delta": { "content": "tail" } }] })
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let items = collect(&client, vec![Message::user("hi")]).await;

    let fragments: Vec<String> = items.into_iter().map(|i| i.unwrap()).collect();
    assert_eq!(fragments, vec!["first", "tail"]);
}
