use std::time::Duration;

use feed_rs::model::Feed;
use feed_rs::parser;
use tracing::debug;
use url::Url;

use crate::fetch::{FetchClient, FetchError, DEFAULT_MAX_BYTES};
use crate::{clip, FeedEntry, NormalizedFeed};

pub const FEED_TITLE_MAX: usize = 120;
/// Feed endpoints tolerate slower origins than page scraping.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Clamp a caller-supplied entry limit into `[1, max]`, falling back to
/// `default` when absent. Takes a signed value so a negative request
/// clamps to 1 instead of failing deserialization.
pub fn clamp_limit(requested: Option<i64>, default: i64, max: i64) -> usize {
    requested.unwrap_or(default).clamp(1, max) as usize
}

/// Parse feed XML, recovering what we can from malformed input. If the
/// strict parse fails, the buffer is cut after the last complete item and
/// the document re-closed for one more attempt; anything still unparseable
/// yields no entries rather than an error.
fn parse_lenient(bytes: &[u8]) -> Option<Feed> {
    if let Ok(feed) = parser::parse(bytes) {
        return Some(feed);
    }
    let text = String::from_utf8_lossy(bytes);
    for (close, tail) in [
        ("</item>", "</channel></rss>"),
        ("</entry>", "</feed>"),
    ] {
        if let Some(pos) = text.rfind(close) {
            let mut repaired = text[..pos + close.len()].to_string();
            repaired.push_str(tail);
            if let Ok(feed) = parser::parse(repaired.as_bytes()) {
                debug!(close, "recovered partial feed from malformed XML");
                return Some(feed);
            }
        }
    }
    None
}

/// Project raw feed XML onto the fixed entry shape, keeping at most `limit`
/// entries. Feed title falls back to the caller-supplied name, then the URL.
pub fn normalize_feed(
    bytes: &[u8],
    url: &str,
    name: Option<&str>,
    limit: usize,
) -> NormalizedFeed {
    let feed = parse_lenient(bytes);

    let own_title = feed
        .as_ref()
        .and_then(|f| f.title.as_ref())
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());
    let title = clip(
        &own_title.unwrap_or_else(|| name.unwrap_or(url).to_string()),
        FEED_TITLE_MAX,
    );

    let entries = feed
        .map(|f| f.entries)
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .map(|e| FeedEntry {
            title: e.title.map(|t| t.content).unwrap_or_default(),
            link: e.links.first().map(|l| l.href.clone()).unwrap_or_default(),
            published: e
                .published
                .or(e.updated)
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            summary: e.summary.map(|t| t.content).unwrap_or_default(),
        })
        .collect();

    NormalizedFeed { title, entries }
}

/// Validate, fetch, and normalize a feed URL in one step. Only transport
/// failures surface as errors; malformed feed content degrades to however
/// many entries could be recovered.
pub async fn fetch_feed(
    client: &FetchClient,
    raw_url: &str,
    name: Option<&str>,
    limit: usize,
) -> Result<NormalizedFeed, FetchError> {
    let url: Url = crate::fetch::validate_target(raw_url)?;
    let fetched = client
        .fetch_text(&url, FEED_TIMEOUT, DEFAULT_MAX_BYTES)
        .await?;
    Ok(normalize_feed(fetched.text.as_bytes(), raw_url, name, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_FIVE: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example Feed</title>
  <item><title>One</title><link>https://e.com/1</link><pubDate>Mon, 06 Sep 2021 00:01:00 GMT</pubDate><description>first</description></item>
  <item><title>Two</title><link>https://e.com/2</link><pubDate>Mon, 06 Sep 2021 00:02:00 GMT</pubDate></item>
  <item><title>Three</title><link>https://e.com/3</link></item>
  <item><title>Four</title><link>https://e.com/4</link></item>
  <item><title>Five</title><link>https://e.com/5</link></item>
</channel></rss>"#;

    #[test]
    fn limit_caps_projected_entries() {
        let feed = normalize_feed(RSS_FIVE.as_bytes(), "https://e.com/rss", None, 2);
        assert_eq!(feed.title, "Example Feed");
        assert_eq!(feed.entries.len(), 2);
        assert!(feed.entries.iter().all(|e| !e.link.is_empty()));
        assert_eq!(feed.entries[0].title, "One");
        assert_eq!(feed.entries[0].summary, "first");
    }

    #[test]
    fn published_falls_back_to_updated() {
        let atom = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:x</id><updated>2021-09-06T00:00:00Z</updated>
  <entry>
    <title>Entry</title>
    <id>urn:x:1</id>
    <link href="https://e.com/a"/>
    <updated>2021-09-06T12:00:00Z</updated>
    <summary>sum</summary>
  </entry>
</feed>"#;
        let feed = normalize_feed(atom.as_bytes(), "https://e.com/atom", None, 10);
        assert_eq!(feed.entries.len(), 1);
        assert!(feed.entries[0].published.starts_with("2021-09-06T12:00:00"));
        assert_eq!(feed.entries[0].summary, "sum");
    }

    #[test]
    fn malformed_tail_recovers_leading_entries() {
        // feed cut off mid-item: everything before the break is kept
        let broken = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Broken</title>
  <item><title>Good</title><link>https://e.com/good</link></item>
  <item><title>Trunc"#;
        let feed = normalize_feed(broken.as_bytes(), "https://e.com/rss", None, 10);
        assert_eq!(feed.title, "Broken");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].link, "https://e.com/good");
    }

    #[test]
    fn garbage_degrades_to_empty_entries() {
        let feed = normalize_feed(b"not xml at all", "https://e.com/rss", Some("My Feed"), 10);
        assert_eq!(feed.title, "My Feed");
        assert!(feed.entries.is_empty());

        let unnamed = normalize_feed(b"<also-not-a-feed/>", "https://e.com/rss", None, 10);
        assert_eq!(unnamed.title, "https://e.com/rss");
    }

    #[test]
    fn limits_clamp_into_range() {
        assert_eq!(clamp_limit(Some(500), 12, 100), 100);
        assert_eq!(clamp_limit(Some(500), 12, 30), 30);
        assert_eq!(clamp_limit(None, 12, 30), 12);
        assert_eq!(clamp_limit(Some(0), 12, 30), 1);
        assert_eq!(clamp_limit(Some(-5), 12, 30), 1);
        assert_eq!(clamp_limit(Some(7), 12, 30), 7);
    }

    #[test]
    fn feed_title_truncates_to_cap() {
        let xml = format!(
            r#"<rss version="2.0"><channel><title>{}</title></channel></rss>"#,
            "T".repeat(400)
        );
        let feed = normalize_feed(xml.as_bytes(), "https://e.com/rss", None, 5);
        assert_eq!(feed.title.chars().count(), FEED_TITLE_MAX);
    }
}
