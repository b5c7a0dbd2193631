//! In-memory chat session state.
//!
//! The session owns the ordered turn list for one process lifetime; nothing
//! is persisted. The `Idle` gate is the only concurrency rule: at most one
//! generation may be in flight, and submissions while busy are no-ops.

use provisional_ai::{Message, Role};

/// Where the session stands in the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingFirstFragment,
    Streaming,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<Message>,
    input: String,
    phase: Phase,
    seed: Option<String>,
    seeded: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether any poem content has arrived yet (gates transcript export).
    pub fn has_poem(&self) -> bool {
        self.turns
            .iter()
            .any(|turn| turn.role == Role::Assistant && !turn.content.is_empty())
    }

    /// Store a prompt carried over from the landing screen.
    pub fn set_seed(&mut self, prompt: impl Into<String>) {
        self.seed = Some(prompt.into());
    }

    /// Consume the carried-over prompt, at most once per session.
    pub fn take_seed(&mut self) -> Option<String> {
        if self.seeded {
            return None;
        }
        let prompt = self.seed.take();
        if prompt.is_some() {
            self.seeded = true;
        }
        prompt
    }

    /// Submit the input buffer.
    ///
    /// No-op when the buffer is empty or a generation is already in flight.
    /// On acceptance: appends the user turn, clears the buffer, opens an
    /// empty assistant turn, and returns the message sequence to send to the
    /// relay (which excludes the just-opened assistant turn).
    pub fn submit(&mut self) -> Option<Vec<Message>> {
        let text = self.input.trim().to_string();
        let outbound = self.submit_text(&text)?;
        self.input.clear();
        Some(outbound)
    }

    /// Submit a prompt directly, bypassing the input buffer (seed path).
    pub fn submit_text(&mut self, text: &str) -> Option<Vec<Message>> {
        let text = text.trim();
        if text.is_empty() || self.phase != Phase::Idle {
            return None;
        }

        self.turns.push(Message::user(text));
        let outbound = self.turns.clone();
        self.turns.push(Message::assistant(""));
        self.phase = Phase::AwaitingFirstFragment;
        Some(outbound)
    }

    /// Append an arriving fragment to the live assistant turn.
    pub fn apply_fragment(&mut self, fragment: &str) {
        if self.phase == Phase::Idle {
            return;
        }
        if let Some(turn) = self.turns.last_mut()
            && turn.role == Role::Assistant
        {
            turn.content.push_str(fragment);
        }
        self.phase = Phase::Streaming;
    }

    /// Settle the current submission, keeping whatever content arrived.
    ///
    /// Covers normal completion and generic stream failures alike.
    pub fn settle(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Settle after a rate-limit rejection: no assistant content was
    /// committed, so the placeholder turn is discarded.
    pub fn settle_rate_limited(&mut self) {
        if let Some(turn) = self.turns.last()
            && turn.role == Role::Assistant
            && turn.content.is_empty()
        {
            self.turns.pop();
        }
        self.phase = Phase::Idle;
    }
}
