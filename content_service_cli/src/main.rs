use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use futures::stream::{self, StreamExt};

use content_service_cli::feed::{clamp_limit, fetch_feed};
use content_service_cli::fetch::{
    validate_target, FetchClient, FetchError, DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT,
};
use content_service_cli::meta::extract_meta;
use content_service_cli::{utils, PageMetadata};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URLs to scrape for preview metadata
    #[arg(short, long, required_unless_present = "feed")]
    url: Vec<String>,

    /// Fetch and normalize a feed instead of scraping pages
    #[arg(short, long)]
    feed: Option<String>,

    /// Maximum number of feed entries to keep
    #[arg(short, long, default_value_t = 12)]
    limit: i64,

    /// Number of concurrent requests
    #[arg(short, long, default_value_t = 4)]
    concurrent: usize,

    /// Output file
    #[arg(short, long, default_value = "result.json")]
    out: String,
}

async fn scrape_one(client: &FetchClient, raw: &str) -> Result<PageMetadata, FetchError> {
    let url = validate_target(raw)?;
    let fetched = client
        .fetch_text(&url, DEFAULT_TIMEOUT, DEFAULT_MAX_BYTES)
        .await?;
    Ok(extract_meta(&fetched.text, raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = Args::parse();
    let client = FetchClient::new()?;

    if let Some(feed_url) = &args.feed {
        let limit = clamp_limit(Some(args.limit), 12, 100);
        let feed = fetch_feed(&client, feed_url, None, limit).await?;
        utils::save_json(&serde_json::to_value(&feed)?, &args.out)?;
        return Ok(());
    }

    let results: Vec<serde_json::Value> = stream::iter(&args.url)
        .map(|raw| {
            let client = &client;
            async move {
                match scrape_one(client, raw).await {
                    Ok(meta) => serde_json::json!(meta),
                    Err(e) => {
                        eprintln!("{}: {}", raw, e);
                        serde_json::json!({ "url": raw, "error": e.to_string() })
                    }
                }
            }
        })
        .buffered(args.concurrent.max(1))
        .collect()
        .await;

    utils::save_json(
        &serde_json::json!({
            "generated_at": Utc::now().to_rfc3339(),
            "results": results,
        }),
        &args.out,
    )?;
    Ok(())
}
