//! End-to-end tests for the relay endpoint against a mocked provider.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use provisional_ai::{OpenAiClient, POET_SYSTEM_PROMPT};
use provisional_server::{AppState, router};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(upstream: &MockServer) -> Router {
    let llm = OpenAiClient::new("test-key").with_base_url(upstream.uri());
    router(AppState::new(Arc::new(llm)))
}

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

fn chat_request(messages: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "messages": messages }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn relays_fragments_in_arrival_order() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["The room ", "holds\n", "its shape"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(chat_request(serde_json::json!([
            { "role": "user", "content": "write a poem" }
        ])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"The room holds\nits shape");
}

#[tokio::test]
async fn prepends_system_turn_and_fixed_params() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(&["ok"]), "text/event-stream"))
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(chat_request(serde_json::json!([
            { "role": "user", "content": "first" },
            { "role": "assistant", "content": "a poem" },
            { "role": "user", "content": "again" }
        ])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let _ = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], POET_SYSTEM_PROMPT);
    assert_eq!(messages[1]["content"], "first");
    assert_eq!(messages[3]["content"], "again");
    assert_eq!(body["stream"], true);
    assert_eq!(body["max_tokens"], 300);
    assert_eq!(body["presence_penalty"], 0.4);
}

#[tokio::test]
async fn upstream_rate_limit_maps_to_429() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "60"))
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(chat_request(serde_json::json!([
            { "role": "user", "content": "hi" }
        ])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], 429);
}

#[tokio::test]
async fn upstream_failure_maps_to_502() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(chat_request(serde_json::json!([
            { "role": "user", "content": "hi" }
        ])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn empty_conversation_is_rejected() {
    let upstream = MockServer::start().await;

    let response = app(&upstream)
        .oneshot(chat_request(serde_json::json!([])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn health_and_pages_are_served() {
    let upstream = MockServer::start().await;
    let app = app(&upstream);

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let landing = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(landing.status(), StatusCode::OK);
    let body = to_bytes(landing.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("The Provisional"));

    let chat = app
        .oneshot(Request::get("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(chat.status(), StatusCode::OK);
}
