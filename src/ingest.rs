//! Raw-file ingestion: load per-source JSON dumps and feed every record
//! through the Source Normalizer. A missing or empty source contributes
//! zero reviews without failing the others; a malformed record is skipped,
//! never fatal for the batch.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::{Review, Source};
use crate::normalize::normalize_record;

/// One raw dump per source, as the scraping layer writes them.
pub fn raw_filename(source: Source) -> &'static str {
    match source {
        Source::Imdb => "reviews_imdb.json",
        Source::RottenTomatoes => "reviews_rottentomatoes.json",
        Source::Instagram => "reviews_instagram.json",
        Source::Reddit => "reviews_reddit.json",
        Source::YouTube => "reviews_youtube.json",
    }
}

/// Fallback when no per-source files exist: one combined dump whose records
/// carry their own `source` tag.
pub const COMBINED_FILE: &str = "reviews_combined.json";

/// Accept either a bare JSON array or `{"reviews": [...]}`.
fn record_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("reviews") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn read_records(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading raw file {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("decoding JSON in {}", path.display()))?;
    Ok(record_list(value))
}

fn normalize_batch(records: &[Value], source: Source) -> (Vec<Review>, usize) {
    let mut reviews = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for record in records {
        match normalize_record(record, source) {
            Some(review) => reviews.push(review),
            None => {
                skipped += 1;
                debug!("Skipping record without usable content - source={}", source);
            }
        }
    }
    (reviews, skipped)
}

/// Load every available raw source from `raw_dir`. Per-source files are
/// preferred; the combined dump is only consulted when none of them yields
/// any review.
pub fn load_raw_reviews(raw_dir: &Path) -> Result<Vec<Review>> {
    let mut all = Vec::new();

    for source in Source::ALL {
        let filename = raw_filename(source);
        let path = raw_dir.join(filename);
        if !path.exists() {
            debug!("Raw file not present - source={}, file={}", source, filename);
            continue;
        }
        let records = read_records(&path)?;
        let (reviews, skipped) = normalize_batch(&records, source);
        if skipped > 0 {
            warn!(
                "Normalization skipped records - source={}, skipped={}, kept={}",
                source,
                skipped,
                reviews.len()
            );
        }
        info!("Raw source loaded - source={}, reviews={}", source, reviews.len());
        all.extend(reviews);
    }

    if all.is_empty() {
        let combined = raw_dir.join(COMBINED_FILE);
        if combined.exists() {
            info!("No per-source files with content, falling back to {}", COMBINED_FILE);
            let records = read_records(&combined)?;
            let mut unknown = 0usize;
            for record in &records {
                let source = record
                    .get("source")
                    .and_then(Value::as_str)
                    .and_then(Source::parse);
                match source {
                    Some(src) => {
                        if let Some(review) = normalize_record(record, src) {
                            all.push(review);
                        }
                    }
                    None => unknown += 1,
                }
            }
            if unknown > 0 {
                warn!("Combined file records with unrecognized source - skipped={}", unknown);
            }
            info!("Combined file loaded - reviews={}", all.len());
        }
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sources_contribute_zero_reviews() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("reviews_reddit.json"),
            json!([{ "data": { "body": "solid racing sequences all around", "score": 3 } }])
                .to_string(),
        )
        .unwrap();
        let reviews = load_raw_reviews(dir.path()).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].source, Source::Reddit);
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("reviews_youtube.json"),
            json!({ "reviews": [
                { "snippet": { "textDisplay": "goosebumps from the first lap", "likeCount": 9 } },
                { "snippet": { "likeCount": 4 } },
                42
            ]})
            .to_string(),
        )
        .unwrap();
        let reviews = load_raw_reviews(dir.path()).unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[test]
    fn combined_fallback_parses_source_tags() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(COMBINED_FILE),
            json!({ "reviews": [
                { "source": "YouTube", "content": "This movie is insane, loved it!!", "likes": 50 },
                { "source": "Reddit", "content": "pretty bad if you ask me", "score": 0 },
                { "source": "Friendster", "content": "???" }
            ]})
            .to_string(),
        )
        .unwrap();
        let reviews = load_raw_reviews(dir.path()).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].source, Source::YouTube);
        assert_eq!(reviews[0].engagement, 50);
        assert_eq!(reviews[1].source, Source::Reddit);
    }

    #[test]
    fn empty_dir_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_raw_reviews(dir.path()).unwrap().is_empty());
    }
}
