use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use crate::ChatMessage;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_NUM_PREDICT: i64 = 300;
/// Generation can be slow; give the upstream model plenty of room.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Check the raw `messages` field before anything touches the network.
/// It must be a non-empty array of `{role, content}` objects.
pub fn validate_messages(raw: Option<&Value>) -> Result<Vec<ChatMessage>, ChatError> {
    let value = raw.ok_or_else(|| ChatError::InvalidPayload("messages is required".into()))?;
    if !value.is_array() {
        return Err(ChatError::InvalidPayload("messages must be a list".into()));
    }
    let messages: Vec<ChatMessage> = serde_json::from_value(value.clone())
        .map_err(|e| ChatError::InvalidPayload(format!("bad message entry: {e}")))?;
    if messages.is_empty() {
        return Err(ChatError::InvalidPayload("messages must not be empty".into()));
    }
    Ok(messages)
}

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub num_predict: Option<i64>,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    default_model: String,
}

impl ChatClient {
    pub fn new(base_url: &str, default_model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: default_model.to_string(),
        }
    }

    /// Request body for the upstream `/api/chat` endpoint. Streaming is
    /// always disabled; the caller gets one complete response.
    fn build_payload(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Value {
        json!({
            "model": opts.model.as_deref().unwrap_or(&self.default_model),
            "messages": messages,
            "stream": false,
            "options": {
                "temperature": opts.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                "top_p": opts.top_p.unwrap_or(DEFAULT_TOP_P),
                "num_predict": opts.num_predict.unwrap_or(DEFAULT_NUM_PREDICT),
            },
        })
    }

    /// Forward a conversation upstream and return the assistant's reply.
    /// An unexpected response shape degrades to an empty string; it is
    /// logged so a misbehaving upstream is still visible.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
    ) -> Result<String, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = self.build_payload(messages, opts);

        let response = self
            .client
            .post(&url)
            .timeout(CHAT_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Upstream(format!(
                "upstream returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Upstream(e.to_string()))?;

        let content = body["message"]["content"].as_str().unwrap_or_else(|| {
            warn!(%url, "upstream response missing message.content, returning empty reply");
            ""
        });
        Ok(content.to_string())
    }
}
