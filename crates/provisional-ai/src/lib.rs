//! Shared LLM layer: chat turn types, the fixed poem-generation parameters,
//! and a streaming OpenAI-compatible completion client.

pub mod error;
pub mod llm;
pub mod prompt;

pub use error::{LlmError, Result};
pub use llm::{FragmentStream, GenerationParams, Message, OpenAiClient, Role};
pub use prompt::{POET_SYSTEM_PROMPT, build_request};
