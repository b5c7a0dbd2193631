//! LLM module - chat types and the streaming completion client

mod client;
mod openai;
mod sse;

pub use client::{FragmentStream, GenerationParams, Message, Role};
pub use openai::OpenAiClient;
pub use sse::SseDecoder;
