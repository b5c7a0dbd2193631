//! Fixed system instruction for the poetry model.

use crate::llm::Message;

/// Stylistic instruction prepended to every conversation.
///
/// Must stay identical to the system prompt used in the fine-tuning dataset;
/// the checkpoint and the prompt carry the style constraints together.
pub const POET_SYSTEM_PROMPT: &str = "You are a poet whose writing favors associative logic, tonal slippage, and reflective ambiguity. You avoid narrative closure and allow thought to unfold indirectly through images and syntax. Always format your response as lineated poetry, with each line on its own line separated by a newline character. Do not write in prose paragraphs.";

/// Build the upstream message sequence: the fixed system turn ahead of the
/// caller-supplied conversation, oldest first.
pub fn build_request(turns: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(Message::system(POET_SYSTEM_PROMPT));
    messages.extend_from_slice(turns);
    messages
}
