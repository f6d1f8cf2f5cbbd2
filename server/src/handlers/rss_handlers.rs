use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use content_service_cli::clip;
use content_service_cli::feed::{clamp_limit, fetch_feed};
use content_service_cli::fetch::FetchError;

use crate::state::AppState;

/// Anything past the first 20 feeds in a batch is silently ignored.
pub const MAX_FEEDS: usize = 20;
pub const BATCH_ITEM_TITLE_MAX: usize = 200;
pub const SINGLE_ITEM_TITLE_MAX: usize = 220;

/// A feed in the batch payload is either a bare URL string or an object
/// carrying a display name alongside the URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeedDescriptor {
    Url(String),
    Named {
        url: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl FeedDescriptor {
    pub fn url(&self) -> &str {
        match self {
            FeedDescriptor::Url(url) => url,
            FeedDescriptor::Named { url, .. } => url,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FeedDescriptor::Url(_) => None,
            FeedDescriptor::Named { name, .. } => name.as_deref(),
        }
    }

    /// How the feed is identified in error entries.
    pub fn label(&self) -> &str {
        self.name().unwrap_or_else(|| self.url())
    }
}

#[derive(Deserialize)]
pub struct RssPayload {
    #[serde(default)]
    pub feeds: Vec<FeedDescriptor>,
    pub limit: Option<i64>,
}

/// POST /api/rss: normalize up to [`MAX_FEEDS`] feeds into one flat item
/// list, at most `limit` entries per feed (default 12, clamped to [1, 30]).
/// A feed that cannot be fetched contributes a single `{feed, error}` entry
/// in its slot; sibling feeds are unaffected.
pub async fn rss_batch(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RssPayload>,
) -> Json<Value> {
    let limit = clamp_limit(payload.limit, 12, 30);
    let feeds: Vec<FeedDescriptor> = payload.feeds.into_iter().take(MAX_FEEDS).collect();
    info!(count = feeds.len(), limit, "normalizing feed batch");

    let concurrency = feeds.len().max(1);
    let per_feed: Vec<Vec<Value>> = stream::iter(feeds)
        .map(|feed| {
            let fetcher = state.fetcher.clone();
            async move {
                match fetch_feed(&fetcher, feed.url(), feed.name(), limit).await {
                    Ok(normalized) => {
                        let feed_title = normalized.title;
                        normalized
                            .entries
                            .into_iter()
                            .map(|e| {
                                json!({
                                    "feed": feed_title,
                                    "title": clip(&e.title, BATCH_ITEM_TITLE_MAX),
                                    "link": e.link,
                                    "published": e.published,
                                })
                            })
                            .collect()
                    }
                    Err(e) => {
                        warn!(feed = feed.label(), error = %e, "feed skipped");
                        vec![json!({ "feed": feed.label(), "error": e.to_string() })]
                    }
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let items: Vec<Value> = per_feed.into_iter().flatten().collect();
    Json(json!({ "items": items }))
}

#[derive(Deserialize)]
pub struct RssFetchParams {
    pub url: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/rss/fetch: fetch and normalize a single feed. Unlike the batch
/// endpoint this one reports failures with real status codes: 400 for a bad
/// target, 502 when the origin cannot be reached.
pub async fn rss_fetch(
    Extension(state): Extension<AppState>,
    Query(params): Query<RssFetchParams>,
) -> (StatusCode, Json<Value>) {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing url", "detail": "url query parameter is required" })),
        );
    };
    let limit = clamp_limit(params.limit, 25, 100);

    match fetch_feed(&state.fetcher, &url, None, limit).await {
        Ok(feed) => {
            let items: Vec<Value> = feed
                .entries
                .into_iter()
                .map(|e| {
                    json!({
                        "title": clip(&e.title, SINGLE_ITEM_TITLE_MAX),
                        "link": e.link,
                        "published": e.published,
                        "summary": e.summary,
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({ "feedTitle": feed.title, "items": items })),
            )
        }
        Err(e @ (FetchError::InvalidScheme | FetchError::InvalidUrl(_))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid url", "detail": e.to_string() })),
        ),
        Err(e) => {
            warn!(%url, error = %e, "feed fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "fetch failed", "detail": e.to_string() })),
            )
        }
    }
}
