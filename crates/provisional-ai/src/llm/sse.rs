//! Incremental server-sent-events decoder.
//!
//! Network chunks may split an event anywhere, including inside a multi-byte
//! UTF-8 sequence, so the buffer holds raw bytes and is only decoded once a
//! complete (blank-line-terminated) event is available.

/// Decodes `data:` payloads out of an SSE byte stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning the `data:` payloads of every event
    /// completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = find_event_end(&self.buffer) {
            let event: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            payloads.extend(parse_event(&event));
        }
        payloads
    }

    /// Decode whatever is left in the buffer as a final event.
    ///
    /// Handles the case where the last event lacks a trailing blank line,
    /// e.g. after a network interruption.
    pub fn drain(&mut self) -> Vec<String> {
        let remaining = std::mem::take(&mut self.buffer);
        parse_event(&remaining)
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn parse_event(event: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(event)
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .filter(|data| !data.trim().is_empty())
        .map(str::to_string)
        .collect()
}
