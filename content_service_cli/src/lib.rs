pub mod ai;
pub mod feed;
pub mod fetch;
pub mod meta;
pub mod utils;

use serde::{Deserialize, Serialize};

/// Identifying user-agent sent with every outbound fetch.
pub const USER_AGENT: &str = "PostCockpit/1.0 (+local drafting tool)";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub site: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NormalizedFeed {
    pub title: String,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Character-wise truncation. Field caps are counted in characters, not
/// bytes, so multi-byte text never gets split mid-codepoint.
pub fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_counts_chars_not_bytes() {
        assert_eq!(clip("héllo wörld", 5), "héllo");
        assert_eq!(clip("short", 100), "short");
        assert_eq!(clip(&"A".repeat(500), 180), "A".repeat(180));
    }
}
