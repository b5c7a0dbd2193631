//! HTTP client for the relay's chunked fragment stream.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use provisional_ai::Message;
use reqwest::Client;

use crate::error::RelayError;

pub type RelayStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send the conversation so far and stream the generated fragments back
    /// in arrival order.
    ///
    /// A 429 from the relay surfaces as `RelayError::RateLimited` before any
    /// fragment; other failures before the first fragment surface as
    /// `RelayError::Api`.
    pub fn stream_chat(&self, turns: &[Message]) -> RelayStream {
        let http = self.http.clone();
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({ "messages": turns });

        Box::pin(async_stream::stream! {
            let response = match http.post(&url).json(&body).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(RelayError::Http(e));
                    return;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 {
                yield Err(RelayError::RateLimited);
                return;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                yield Err(RelayError::Api {
                    status: status.as_u16(),
                    message,
                });
                return;
            }

            let mut chunks = response.bytes_stream();
            let mut decoder = Utf8Chunks::default();

            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(bytes) => {
                        if let Some(fragment) = decoder.push(&bytes) {
                            yield Ok(fragment);
                        }
                    }
                    Err(e) => {
                        yield Err(RelayError::Stream(e.to_string()));
                        return;
                    }
                }
            }

            if let Some(fragment) = decoder.flush() {
                yield Ok(fragment);
            }
        })
    }
}

/// Reassembles UTF-8 across chunk boundaries.
///
/// The relay forwards provider fragments byte-for-byte, so a chunk may end
/// inside a multi-byte sequence; the incomplete tail is held back until the
/// next chunk completes it.
#[derive(Debug, Default)]
struct Utf8Chunks {
    pending: Vec<u8>,
}

impl Utf8Chunks {
    fn push(&mut self, bytes: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(bytes);

        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) => e.valid_up_to(),
        };
        if valid == 0 {
            return None;
        }

        let fragment = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.drain(..valid);
        Some(fragment)
    }

    fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let fragment = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(fragment)
    }
}
