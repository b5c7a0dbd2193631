//! Transcript export.

use std::io;
use std::path::Path;

use provisional_ai::{Message, Role};

/// Default export file name.
pub const POEM_FILE: &str = "poem.txt";

const DIVIDER: &str = "\n\n---\n\n";

/// Render the session as a flat text document. Pure; no IO.
pub fn render(turns: &[Message]) -> String {
    turns
        .iter()
        .map(|turn| match turn.role {
            Role::User => format!("You:\n{}", turn.content),
            _ => format!("Poem:\n{}", turn.content),
        })
        .collect::<Vec<_>>()
        .join(DIVIDER)
}

/// Write the rendered transcript to `path`.
pub fn save(turns: &[Message], path: impl AsRef<Path>) -> io::Result<()> {
    std::fs::write(path, render(turns))
}
