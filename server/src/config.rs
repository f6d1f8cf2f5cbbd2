use std::env;

/// Runtime configuration, read once at startup and passed into the state.
/// Every key has a fallback so the server runs with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ollama_url: String,
    pub ollama_model: String,
    /// CORS origin for the drafting frontend; permissive when unset.
    pub client_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5010),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            client_url: env::var("CLIENT_URL").ok(),
        }
    }
}
