use scraper::{Html, Selector};

use crate::{clip, PageMetadata};

pub const TITLE_MAX: usize = 180;
pub const DESCRIPTION_MAX: usize = 300;
pub const SITE_MAX: usize = 80;

/// Evaluate an ordered list of selector fallbacks, returning the first
/// non-empty hit. A meta tag's `content` attribute wins over element text
/// when both are present; an element that matches but yields nothing falls
/// through to the next selector.
fn pick(doc: &Html, selectors: &[&str]) -> String {
    for raw in selectors {
        let sel = Selector::parse(raw).unwrap();
        for el in doc.select(&sel) {
            if let Some(content) = el.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return content.to_string();
                }
            }
            let text = el.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    String::new()
}

/// Extract page preview metadata from an HTML document. Never fails: a page
/// with no usable tags yields the URL as title and empty strings elsewhere.
pub fn extract_meta(html: &str, url: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title = pick(&doc, &["meta[property='og:title']", "title"]);
    let description = pick(
        &doc,
        &["meta[property='og:description']", "meta[name='description']"],
    );
    let site = pick(&doc, &["meta[property='og:site_name']"]);

    PageMetadata {
        url: url.to_string(),
        title: clip(if title.is_empty() { url } else { &title }, TITLE_MAX),
        description: clip(&description, DESCRIPTION_MAX),
        site: clip(&site, SITE_MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_tags_win_over_element_text() {
        let html = r#"<html><head>
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG description.">
            <meta property="og:site_name" content="Example Site">
            <title>Plain Title</title>
            <meta name="description" content="Plain description.">
        </head></html>"#;
        let meta = extract_meta(html, "https://example.com/post");
        assert_eq!(meta.title, "OG Title");
        assert_eq!(meta.description, "OG description.");
        assert_eq!(meta.site, "Example Site");
        assert_eq!(meta.url, "https://example.com/post");
    }

    #[test]
    fn falls_back_through_the_selector_chain() {
        let html = r#"<html><head>
            <meta property="og:title" content="">
            <title>Plain Title</title>
            <meta name="description" content="Plain description.">
        </head></html>"#;
        let meta = extract_meta(html, "https://example.com");
        // empty og:title falls through to <title>
        assert_eq!(meta.title, "Plain Title");
        assert_eq!(meta.description, "Plain description.");
        assert_eq!(meta.site, "");
    }

    #[test]
    fn bare_page_defaults_title_to_url() {
        let meta = extract_meta("<html><body>hi</body></html>", "http://a.example/x");
        assert_eq!(meta.title, "http://a.example/x");
        assert_eq!(meta.description, "");
        assert_eq!(meta.site, "");
    }

    #[test]
    fn fields_truncate_to_fixed_lengths() {
        let long = "A".repeat(500);
        let html = format!(
            "<html><head><meta property='og:title' content='{t}'>\
             <meta property='og:description' content='{t}'>\
             <meta property='og:site_name' content='{t}'></head></html>",
            t = long
        );
        let meta = extract_meta(&html, "https://example.com");
        assert_eq!(meta.title, "A".repeat(180));
        assert_eq!(meta.description.chars().count(), 300);
        assert_eq!(meta.site.chars().count(), 80);
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = "<html><head><title>Same</title></head></html>";
        let a = extract_meta(html, "https://example.com");
        let b = extract_meta(html, "https://example.com");
        assert_eq!(a, b);
    }
}
