//! The completion relay: `POST /api/chat`

use axum::{
    Json,
    body::Body,
    extract::State,
    http::header,
    response::Response,
};
use futures::{StreamExt, stream};
use provisional_ai::{Message, prompt};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Relay a conversation to the provider and stream the completion back as a
/// chunked plain-text body.
///
/// The first upstream item is awaited before the response status commits, so
/// a pre-stream failure maps to a real status code (429 for a rate limit,
/// 502 otherwise). Once streaming has begun, an upstream failure just ends
/// the body early; fragments already sent are not retracted.
pub async fn relay_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if request.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }

    tracing::info!(turns = request.messages.len(), "relaying chat completion");

    let messages = prompt::build_request(&request.messages);
    let mut fragments = state.llm.complete_stream(messages);

    let first = match fragments.next().await {
        None => return Ok(text_stream(stream::empty())),
        Some(Err(err)) => return Err(err.into()),
        Some(Ok(fragment)) => fragment,
    };

    let rest = fragments.inspect(|item| {
        if let Err(err) = item {
            tracing::warn!(error = %err, "stream aborted mid-response");
        }
    });
    let body = stream::iter([Ok(first)]).chain(rest);

    Ok(text_stream(body))
}

fn text_stream<S>(fragments: S) -> Response
where
    S: futures::Stream<Item = provisional_ai::Result<String>> + Send + 'static,
{
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(fragments))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
