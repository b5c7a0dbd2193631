//! Interactive chat screens: landing prompt selection and the chat loop.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use futures::{Stream, StreamExt};

use crate::client::RelayClient;
use crate::error::RelayError;
use crate::session::ChatSession;
use crate::transcript;

/// Example prompts offered on the landing screen.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "Write a short poem about the present moment. Let the sentence revise itself once. Avoid ending conclusively.",
    "Write a poem where abstraction feels social. Keep the setting indoors. Let the tone shift slightly midway.",
    "Write a poem that begins mid-thought. Allow syntax to guide the movement. End with uncertainty rather than resolution.",
];

/// How a fragment stream ended.
#[derive(Debug)]
pub enum StreamOutcome {
    Completed,
    RateLimited,
    Failed(RelayError),
}

/// Drain a fragment stream into the session, invoking `on_fragment` for each
/// arriving piece so the caller can render incrementally.
pub async fn pump_stream<S, F>(
    session: &mut ChatSession,
    mut stream: S,
    mut on_fragment: F,
) -> StreamOutcome
where
    S: Stream<Item = Result<String, RelayError>> + Unpin,
    F: FnMut(&str),
{
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                on_fragment(&fragment);
                session.apply_fragment(&fragment);
            }
            Err(RelayError::RateLimited) => {
                session.settle_rate_limited();
                return StreamOutcome::RateLimited;
            }
            Err(err) => {
                session.settle();
                return StreamOutcome::Failed(err);
            }
        }
    }

    session.settle();
    StreamOutcome::Completed
}

/// Landing screen: pick an example prompt or type one. Loops until a
/// non-empty prompt is entered.
pub fn landing_prompt() -> Result<String> {
    println!("{}", "The Provisional v0.1".bold());
    println!("Pick an example or type your own prompt.\n");
    for (i, example) in EXAMPLE_PROMPTS.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).dimmed(), example);
    }
    println!();

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            anyhow::bail!("stdin closed before a prompt was entered");
        }
        let line = line.trim();

        if let Ok(choice) = line.parse::<usize>()
            && (1..=EXAMPLE_PROMPTS.len()).contains(&choice)
        {
            return Ok(EXAMPLE_PROMPTS[choice - 1].to_string());
        }
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
}

/// Chat screen: consume the carried-over prompt once, then loop on input.
pub async fn run(session: &mut ChatSession, relay: &RelayClient) -> Result<()> {
    if let Some(prompt) = session.take_seed() {
        println!("\n{}\n{}\n", "You:".bold(), prompt);
        if let Some(outbound) = session.submit_text(&prompt) {
            stream_poem(session, relay, outbound).await;
        }
    }

    println!(
        "{}",
        "Refine or continue. /save writes poem.txt, /quit exits.".dimmed()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "/quit" | "/exit" => break,
            "/save" => {
                if session.has_poem() {
                    transcript::save(session.turns(), transcript::POEM_FILE)?;
                    println!("Saved {}", transcript::POEM_FILE.bold());
                } else {
                    println!("{}", "Nothing to save yet.".dimmed());
                }
            }
            _ => {
                session.set_input(line);
                if let Some(outbound) = session.submit() {
                    stream_poem(session, relay, outbound).await;
                }
            }
        }
    }

    Ok(())
}

async fn stream_poem(
    session: &mut ChatSession,
    relay: &RelayClient,
    outbound: Vec<provisional_ai::Message>,
) {
    println!("{}", "Poem:".green().bold());

    let stream = relay.stream_chat(&outbound);
    let outcome = pump_stream(session, stream, |fragment| {
        print!("{fragment}");
        io::stdout().flush().ok();
    })
    .await;
    println!();

    match outcome {
        StreamOutcome::Completed => {}
        StreamOutcome::RateLimited => {
            println!(
                "{}",
                "You have reached your request limit for the day."
                    .yellow()
                    .bold()
            );
        }
        StreamOutcome::Failed(err) => {
            tracing::warn!(error = %err, "stream ended early; keeping partial poem");
        }
    }
    println!();
}
