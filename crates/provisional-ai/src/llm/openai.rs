//! OpenAI-compatible streaming completion client

use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::llm::client::{FragmentStream, GenerationParams, Message};
use crate::llm::sse::SseDecoder;

/// Streaming chat-completions client.
///
/// Stateless across requests; a single instance may serve any number of
/// concurrent callers.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    params: GenerationParams,
}

impl OpenAiClient {
    /// Create a new client with the default generation parameters.
    ///
    /// An empty key is tolerated here; the provider rejects the request
    /// at call time instead.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            params: GenerationParams::default(),
        }
    }

    /// Set custom base URL (for API-compatible services)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Request a streaming completion for the given conversation.
    ///
    /// Yields each incremental content fragment as it arrives, in order and
    /// byte-for-byte. A pre-stream failure is reported as the first and only
    /// item; a mid-stream failure ends the stream after one `Err` (fragments
    /// already yielded are not retracted).
    pub fn complete_stream(&self, messages: Vec<Message>) -> FragmentStream {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let url = format!("{}/chat/completions", self.base_url);
        let body = StreamRequest {
            params: self.params.clone(),
            messages,
            stream: true,
        };

        Box::pin(async_stream::stream! {
            let response = match client
                .post(&url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(LlmError::Http(e));
                    return;
                }
            };

            if !response.status().is_success() {
                yield Err(response_to_error(response).await);
                return;
            }

            tracing::debug!(status = %response.status(), "completion stream opened");

            let mut byte_stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(LlmError::Stream(e.to_string()));
                        return;
                    }
                };

                for data in decoder.push(&chunk) {
                    if let Some(fragment) = parse_delta(&data) {
                        yield Ok(fragment);
                    }
                }
            }

            // The last event may lack its trailing blank line.
            for data in decoder.drain() {
                if let Some(fragment) = parse_delta(&data) {
                    yield Ok(fragment);
                }
            }
        })
    }
}

#[derive(Serialize)]
struct StreamRequest {
    #[serde(flatten)]
    params: GenerationParams,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize, Debug)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Debug, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// Extract the content fragment from one SSE payload, if it carries any.
fn parse_delta(data: &str) -> Option<String> {
    if data.trim() == "[DONE]" {
        return None;
    }

    // Unparseable payloads (role announcements, finish markers) are skipped.
    let parsed: StreamResponse = serde_json::from_str(data).ok()?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
}

fn parse_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
}

async fn response_to_error(response: Response) -> LlmError {
    let status = response.status().as_u16();
    if status == 429 {
        return LlmError::RateLimited {
            retry_after_secs: parse_retry_after(&response),
        };
    }

    let body = response.text().await.unwrap_or_default();

    // Truncate error body to prevent leaking large or sensitive responses.
    const MAX_ERROR_BODY: usize = 512;
    let message = if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &body[..end])
    } else {
        body
    };

    LlmError::Api { status, message }
}
