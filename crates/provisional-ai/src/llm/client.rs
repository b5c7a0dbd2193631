//! Chat message types and generation parameters

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in a chat transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Default model: the fine-tuned poetry checkpoint the original deployment runs.
pub const DEFAULT_MODEL: &str =
    "ft:gpt-4.1-2025-04-14:brown-university-library-cds:weirding-cody:DAhGkXPQ";

/// Sampling parameters sent with every completion request.
///
/// Immutable for the lifetime of the process; every request carries the
/// same record.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub model: String,
    /// Hard cap on output length, sized for short poems.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Penalizes tokens that already appeared, to avoid repeated imagery.
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 1.0,
            presence_penalty: 0.4,
            frequency_penalty: 0.3,
        }
    }
}

impl GenerationParams {
    /// Override the model identifier, keeping the sampling parameters fixed.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A lazy, finite, non-restartable sequence of generated text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;
