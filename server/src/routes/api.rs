use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::handlers::ai_handlers::chat;
use crate::handlers::rss_handlers::{rss_batch, rss_fetch};
use crate::handlers::scrape_handlers::scrape;
use crate::state::AppState;

async fn healthz() -> &'static str {
    "OK"
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/scrape", post(scrape))
        .route("/rss", post(rss_batch))
        .route("/rss/fetch", get(rss_fetch))
        .route("/ai/chat", post(chat))
        .layer(Extension(state))
}

/// Full application router; `main` adds the CORS layer on top.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes(state))
}
