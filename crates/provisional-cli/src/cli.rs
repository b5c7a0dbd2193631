use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "provisional", about = "Terminal chat for the Provisional poem relay")]
pub struct Cli {
    /// Relay server URL
    #[arg(
        long,
        env = "PROVISIONAL_RELAY_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    pub relay_url: String,

    /// Starting prompt; skips the landing screen
    pub prompt: Option<String>,
}
