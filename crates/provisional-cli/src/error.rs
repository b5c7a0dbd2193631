use colored::Colorize;
use thiserror::Error;

/// Errors observed while talking to the relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The relay reported the upstream request limit (HTTP 429).
    #[error("request limit reached")]
    RateLimited,

    #[error("relay returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("connection refused") || msg.contains("network") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Is the relay running? Start it with:");
        eprintln!("  {} provisional-server", "$".dimmed());
    }

    std::process::exit(1);
}
