mod chat;
mod cli;
mod client;
mod error;
mod session;
mod transcript;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use client::RelayClient;
use session::ChatSession;

#[tokio::main]
async fn main() {
    // Logs go to stderr, quiet by default, so fragments render cleanly.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        error::handle_error(err);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let relay = RelayClient::new(cli.relay_url);

    let mut session = ChatSession::new();
    let prompt = match cli.prompt {
        Some(prompt) => prompt,
        None => chat::landing_prompt()?,
    };
    session.set_seed(prompt);

    chat::run(&mut session, &relay).await
}
