#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use anyhow::Result;

use provisional_server::api::{self, AppState};
use provisional_server::config::{RelayConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provisional_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting Provisional relay server");

    let relay = RelayConfig::from_env();
    if relay.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is empty; completion requests will fail upstream auth");
    }

    let state = AppState::new(Arc::new(relay.client()));
    let app = api::router(state);

    let server = ServerConfig::default();
    let listener = tokio::net::TcpListener::bind(server.bind_addr()).await?;
    tracing::info!("Provisional running on http://{}", server.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
