use axum::{Extension, Json};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use content_service_cli::fetch::{
    validate_target, FetchClient, FetchError, DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT,
};
use content_service_cli::meta::extract_meta;
use content_service_cli::PageMetadata;

use crate::state::AppState;

/// Anything past the first 30 URLs in a batch is silently ignored.
pub const MAX_URLS: usize = 30;

#[derive(Deserialize)]
pub struct ScrapePayload {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ScrapeOutcome {
    Ok {
        ok: bool,
        #[serde(flatten)]
        meta: PageMetadata,
    },
    Err {
        ok: bool,
        url: String,
        error: String,
    },
}

async fn scrape_one(fetcher: &FetchClient, raw: String) -> ScrapeOutcome {
    let result: Result<PageMetadata, FetchError> = async {
        let url = validate_target(&raw)?;
        let fetched = fetcher
            .fetch_text(&url, DEFAULT_TIMEOUT, DEFAULT_MAX_BYTES)
            .await?;
        Ok(extract_meta(&fetched.text, &raw))
    }
    .await;

    match result {
        Ok(meta) => ScrapeOutcome::Ok { ok: true, meta },
        Err(e) => ScrapeOutcome::Err {
            ok: false,
            url: raw,
            error: e.to_string(),
        },
    }
}

/// POST /api/scrape: fetch preview metadata for up to [`MAX_URLS`] pages.
/// Items run concurrently but results come back in input order, and one
/// failed URL never sinks the batch: the response is always 200 with a
/// mixed ok/error list.
pub async fn scrape(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScrapePayload>,
) -> Json<serde_json::Value> {
    let urls: Vec<String> = payload.urls.into_iter().take(MAX_URLS).collect();
    info!(count = urls.len(), "scraping url batch");

    let concurrency = urls.len().max(1);
    let results: Vec<ScrapeOutcome> = stream::iter(urls)
        .map(|raw| {
            let fetcher = state.fetcher.clone();
            async move { scrape_one(&fetcher, raw).await }
        })
        .buffered(concurrency)
        .collect()
        .await;

    Json(json!({ "results": results }))
}
