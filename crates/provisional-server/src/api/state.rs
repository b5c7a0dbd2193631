use std::sync::Arc;

use provisional_ai::OpenAiClient;

/// Application state shared across all API handlers.
///
/// The relay holds no per-session state; concurrent requests share only the
/// completion client.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<OpenAiClient>,
}

impl AppState {
    pub fn new(llm: Arc<OpenAiClient>) -> Self {
        Self { llm }
    }
}
