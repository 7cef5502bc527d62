//! Report generation
//!
//! Flattens the batch results into `(url, email)` rows, deduplicates emails
//! across the whole dataset, re-validates every email against the pattern,
//! and writes the CSV spreadsheet.

use crate::crawler::ResultMap;
use crate::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// One spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub url: String,

    /// `None` is written as an empty email cell
    pub email: Option<String>,
}

/// Builds the final rows, iterating seeds in input order
///
/// Seed input order makes the cross-dataset "first occurrence wins"
/// deduplication deterministic even though the batch completes in
/// arbitrary order. Every email is re-validated against the pattern
/// before it is admitted; page-level error payloads live outside the
/// email lists, so they can never leak into the email column. A seed
/// whose emails were all invalid, duplicate, or absent still gets one
/// row with an empty email, keeping every organization visible.
pub fn build_rows(seeds: &[Url], results: &ResultMap, email_pattern: &Regex) -> Vec<ReportRow> {
    let mut seen_seeds = HashSet::new();
    let mut seen_emails = HashSet::new();
    let mut rows = Vec::new();

    for seed in seeds {
        let seed_str = seed.to_string();
        if !seen_seeds.insert(seed_str.clone()) {
            continue;
        }

        let before = rows.len();

        for page in results.get(&seed_str).into_iter().flatten() {
            for email in &page.emails {
                if !email_pattern.is_match(email) {
                    continue;
                }
                if !seen_emails.insert(email.clone()) {
                    continue;
                }
                rows.push(ReportRow {
                    url: seed_str.clone(),
                    email: Some(email.clone()),
                });
            }
        }

        if rows.len() == before {
            rows.push(ReportRow {
                url: seed_str,
                email: None,
            });
        }
    }

    rows
}

/// Writes rows to a CSV file with `url,email` columns
pub fn write_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["url", "email"])?;
    for row in rows {
        writer.write_record([row.url.as_str(), row.email.as_deref().unwrap_or("")])?;
    }

    writer.flush()?;
    Ok(())
}
