pub mod ai_handlers;
pub mod rss_handlers;
pub mod scrape_handlers;
