use content_service_cli::ai::ChatClient;
use content_service_cli::fetch::{FetchClient, FetchError};

use crate::config::Config;

/// Shared per-process clients. Both wrap a reqwest `Client`, so cloning the
/// state per request is cheap and there is no mutable state to guard.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: FetchClient,
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(AppState {
            fetcher: FetchClient::new()?,
            chat: ChatClient::new(&config.ollama_url, &config.ollama_model),
        })
    }
}
