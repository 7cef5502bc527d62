//! Contact-link discovery
//!
//! Scans a page's anchors for hrefs that look like links to contact pages.

use scraper::{Html, Selector};

/// Returns the hrefs of all anchors whose href contains any keyword
///
/// Matching is a case-insensitive substring test against the href text
/// itself, not the link's visible label. Results come back in document
/// order, undeduplicated and unresolved; relative hrefs are resolved
/// later, against the page they came from. The parser recovers on
/// malformed markup, so broken pages yield whatever anchors are still
/// recognizable.
///
/// # Arguments
///
/// * `html` - The page markup to scan
/// * `keywords` - Substrings that mark an href as contact-like
pub fn discover_contact_links(html: &str, keywords: &[String]) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| {
            let href = href.to_lowercase();
            keywords.iter().any(|keyword| href.contains(keyword.as_str()))
        })
        .map(|href| href.to_string())
        .collect()
}
