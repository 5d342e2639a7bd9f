use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five platforms commentary is harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "IMDB")]
    Imdb,
    #[serde(rename = "Rotten Tomatoes")]
    RottenTomatoes,
    Instagram,
    Reddit,
    YouTube,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Imdb,
        Source::RottenTomatoes,
        Source::Instagram,
        Source::Reddit,
        Source::YouTube,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Imdb => "IMDB",
            Source::RottenTomatoes => "Rotten Tomatoes",
            Source::Instagram => "Instagram",
            Source::Reddit => "Reddit",
            Source::YouTube => "YouTube",
        }
    }

    /// Parse a source tag as it appears in combined raw files.
    pub fn parse(s: &str) -> Option<Source> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "imdb" => Some(Source::Imdb),
            "rottentomatoes" => Some(Source::RottenTomatoes),
            "instagram" => Some(Source::Instagram),
            "reddit" => Some(Source::Reddit),
            "youtube" => Some(Source::YouTube),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source-native rating indicator. Never normalized to a common scale:
/// IMDB carries 1-10 integers, Rotten Tomatoes "Fresh"/"Rotten" or a
/// numeric audience score, the social sources none at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Category(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-component valence result attached to a review by the scoring stage.
/// `neg`/`neu`/`pos` are proportions in [0,1] summing to 1, `compound` is
/// the saturating-normalized overall polarity in [-1,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
    pub label: SentimentLabel,
}

/// Canonical review record all five source shapes converge into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub source: Source,
    pub content: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Likes/upvotes/helpful votes, the single weighting signal downstream.
    #[serde(default)]
    pub engagement: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentScore>,
    /// Source-specific extension fields (video_id, subreddit, post_code...).
    /// Preserved verbatim, never required by downstream stages.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Review {
    pub fn label(&self) -> SentimentLabel {
        self.sentiment
            .as_ref()
            .map(|s| s.label)
            .unwrap_or(SentimentLabel::Neutral)
    }
}

/// Flat stage output: the cleaned (and later sentiment-annotated) dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDataset {
    pub subject: String,
    pub generated_at: String,
    pub total_reviews: usize,
    pub sources: BTreeMap<String, usize>,
    pub reviews: Vec<Review>,
}

impl ReviewDataset {
    pub fn new(subject: &str, generated_at: String, reviews: Vec<Review>) -> Self {
        let mut sources = BTreeMap::new();
        for r in &reviews {
            *sources.entry(r.source.name().to_string()).or_insert(0usize) += 1;
        }
        ReviewDataset {
            subject: subject.to_string(),
            generated_at,
            total_reviews: reviews.len(),
            sources,
            reviews,
        }
    }
}

/// Outcome of a stage that depends on an optional capability (the sentiment
/// lexicon). Serialized with a `status` tag so consumers can detect the
/// degraded case without failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis<T> {
    Ready(T),
    Unavailable { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_roundtrip_names() {
        for src in Source::ALL {
            assert_eq!(Source::parse(src.name()), Some(src));
        }
        assert_eq!(Source::parse("rotten tomatoes"), Some(Source::RottenTomatoes));
        assert_eq!(Source::parse("MySpace"), None);
    }

    #[test]
    fn review_extra_fields_flatten() {
        let json = serde_json::json!({
            "source": "YouTube",
            "content": "great trailer",
            "author": "a",
            "engagement": 3,
            "video_id": "abc123"
        });
        let r: Review = serde_json::from_value(json).unwrap();
        assert_eq!(r.source, Source::YouTube);
        assert_eq!(r.extra.get("video_id").and_then(|v| v.as_str()), Some("abc123"));
        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back.get("video_id").and_then(|v| v.as_str()), Some("abc123"));
    }

    #[test]
    fn analysis_unavailable_is_tagged() {
        let a: Analysis<ReviewDataset> = Analysis::Unavailable {
            reason: "lexicon missing".into(),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v.get("status").and_then(|s| s.as_str()), Some("unavailable"));
    }
}
