//! Email extraction
//!
//! Applies the email pattern to raw markup, so addresses hidden in
//! comments, scripts, and mailto hrefs are caught too. The price is the
//! occasional false positive from minified JS; the report pass re-validates
//! every row against the same pattern before anything is written.

use regex::Regex;

/// Returns all non-overlapping pattern matches in order of first appearance
///
/// Duplicates are preserved here; cross-dataset deduplication happens when
/// the report is assembled.
pub fn extract_emails(html: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}
