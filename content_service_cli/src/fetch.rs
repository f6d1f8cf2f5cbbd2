use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::USER_AGENT;

/// Default wall-clock timeout for a single fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
/// Soft cap on bytes read from a response body.
pub const DEFAULT_MAX_BYTES: usize = 2_000_000;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Only http/https URLs are allowed.")]
    InvalidScheme,
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parse a target and require an http/https scheme before any I/O happens.
/// `Url` lowercases the scheme during parsing, so the check is
/// case-insensitive.
pub fn validate_target(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(FetchError::InvalidScheme),
    }
}

#[derive(Debug, Clone)]
pub struct FetchedText {
    pub text: String,
    pub truncated: bool,
}

#[derive(Clone)]
pub struct FetchClient {
    http: Client,
}

impl FetchClient {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            http: Client::builder().user_agent(USER_AGENT).build()?,
        })
    }

    /// Single GET with a hard timeout and a soft byte cap: reading stops at
    /// the first chunk boundary past `max_bytes`, so the result may exceed
    /// the cap by up to one chunk. Bytes are decoded lossily; undecodable
    /// sequences become replacement characters instead of failing the fetch.
    pub async fn fetch_text(
        &self,
        url: &Url,
        timeout: Duration,
        max_bytes: usize,
    ) -> Result<FetchedText, FetchError> {
        let mut res = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await?;
        res.error_for_status_ref()?;

        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = res.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > max_bytes {
                truncated = true;
                break;
            }
        }

        Ok(FetchedText {
            text: String::from_utf8_lossy(&body).into_owned(),
            truncated,
        })
    }
}
