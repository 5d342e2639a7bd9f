//! Cleaning & Filtering Engine.
//!
//! Light cleaning strips URLs, markdown links, inline timestamps and excess
//! whitespace — and nothing else. Negations ("not", "no", contracted "n't")
//! must survive untouched: the sentiment engine relies on them to invert
//! polarity. Stop-word removal is a separate path that only the thematic
//! tokenizer uses, never the sentiment input.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::Review;
use crate::stopwords::is_noise_word;

/// Content shorter than this (normalized) is never deduplicated: too
/// ambiguous to safely collapse.
pub const DEDUP_MIN_CHARS: usize = 25;
/// Dedup keys hash only this prefix of the normalized content.
pub const DEDUP_PREFIX_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub min_content_length: usize,
    pub min_words: usize,
    pub deduplicate: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            min_content_length: 15,
            min_words: 3,
            deduplicate: true,
        }
    }
}

fn md_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap())
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)https?://\S+|www\.\S+").unwrap())
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}\b").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\w']+").unwrap())
}

/// Sentiment-safe cleanup: markdown links keep their text, raw URLs and
/// inline timestamps (`0:27`-style YouTube markers) become spaces,
/// whitespace collapses. Idempotent.
pub fn light_clean(text: &str) -> String {
    let text = md_link_re().replace_all(text, "$1");
    let text = url_re().replace_all(&text, " ");
    let text = timestamp_re().replace_all(&text, " ");
    let text = whitespace_re().replace_all(&text, " ");
    text.trim().to_string()
}

/// Words of at least two characters, lowercased.
fn significant_words(content: &str) -> Vec<String> {
    word_re()
        .find_iter(&content.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|w| w.chars().count() >= 2)
        .collect()
}

fn is_valid(content: &str, opts: &CleanOptions) -> bool {
    if content.chars().count() < opts.min_content_length {
        return false;
    }
    let words = significant_words(content);
    if words.len() < opts.min_words {
        return false;
    }
    // a short burst of pure laughter/interjections carries no opinion
    if words.len() <= 3 && words.iter().all(|w| is_noise_word(w)) {
        return false;
    }
    true
}

/// Dedup key: xxh3 of the NFC-normalized, lowercased, truncated content.
/// `None` marks content too short to deduplicate.
fn dedup_key(content: &str) -> Option<u64> {
    let normalized: String = content.trim().nfc().collect::<String>().to_lowercase();
    if normalized.chars().count() < DEDUP_MIN_CHARS {
        return None;
    }
    let prefix: String = normalized.chars().take(DEDUP_PREFIX_CHARS).collect();
    Some(xxh3_64(prefix.as_bytes()))
}

/// Full cleaning pass: light-clean each record, drop invalid ones, then
/// deduplicate keeping first occurrences. Returns a new collection; survivor
/// order matches input order.
pub fn clean_reviews(reviews: Vec<Review>, opts: &CleanOptions) -> Vec<Review> {
    let mut cleaned: Vec<Review> = reviews
        .into_iter()
        .map(|mut r| {
            r.content = light_clean(&r.content);
            r.author = r.author.trim().to_string();
            if let Some(serde_json::Value::String(title)) = r.extra.get_mut("title") {
                let cleaned = light_clean(title);
                *title = cleaned;
            }
            r
        })
        .filter(|r| is_valid(&r.content, opts))
        .collect();

    if opts.deduplicate {
        let mut seen: HashSet<u64> = HashSet::new();
        cleaned.retain(|r| match dedup_key(&r.content) {
            Some(key) => seen.insert(key),
            None => true,
        });
    }
    cleaned
}
