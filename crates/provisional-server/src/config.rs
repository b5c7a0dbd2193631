use provisional_ai::{GenerationParams, OpenAiClient};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1)
    pub host: String,
    /// Port to listen on (default: 3000)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let host = std::env::var("PROVISIONAL_HTTP_HOST")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let port = std::env::var("PROVISIONAL_HTTP_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);

        Self { host, port }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream provider configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Provider credential. An empty value is tolerated at startup; every
    /// request then fails upstream authentication.
    pub api_key: String,
    /// Base URL override for API-compatible services.
    pub base_url: Option<String>,
    /// Model override; defaults to the fine-tuned poetry checkpoint.
    pub model: Option<String>,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("PROVISIONAL_OPENAI_BASE_URL").ok(),
            model: std::env::var("PROVISIONAL_MODEL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn client(&self) -> OpenAiClient {
        let mut params = GenerationParams::default();
        if let Some(model) = &self.model {
            params = params.with_model(model);
        }

        let mut client = OpenAiClient::new(self.api_key.clone()).with_params(params);
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url);
        }
        client
    }
}
