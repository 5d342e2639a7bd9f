//! Source Normalizer: one table-driven mapping per source, converging the
//! five raw record shapes into the canonical `Review`.
//!
//! Each source owns a `FieldTable` of priority-ordered dot-path candidates;
//! source-native paths come first (the shapes the platform APIs emit),
//! canonical field names last (so records a scraper already flattened still
//! normalize). Engagement falls back to one uniform precedence order
//! (`likes` > `helpful_votes` > `score` > `ups`) after the source-primary
//! paths, and every parse failure degrades to 0 instead of erroring.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{Rating, Review, Source};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Canonical engagement fallback, applied uniformly after source-primary paths.
const ENGAGEMENT_FALLBACK: &[&str] = &["likes", "helpful_votes", "score", "ups"];

/// Extension fields worth carrying through the pipeline; never required
/// downstream. First matching path wins.
const EXTRA_FIELDS: &[(&str, &[&str])] = &[
    ("title", &["title", "data.title"]),
    ("video_id", &["video_id", "snippet.videoId"]),
    ("subreddit", &["subreddit", "data.subreddit"]),
    ("post_code", &["post_code"]),
    ("post_id", &["post_id", "data.id"]),
    ("comment_id", &["comment_id", "id", "pk"]),
    ("movie_id", &["movie_id"]),
    ("review_type", &["review_type"]),
];

pub struct FieldTable {
    pub content: &'static [&'static str],
    pub author: &'static [&'static str],
    pub date: &'static [&'static str],
    pub engagement: &'static [&'static str],
    pub has_rating: bool,
}

static IMDB_FIELDS: FieldTable = FieldTable {
    content: &["content", "text"],
    author: &["author"],
    date: &["date"],
    engagement: &["helpful_votes"],
    has_rating: true,
};

static ROTTEN_TOMATOES_FIELDS: FieldTable = FieldTable {
    content: &["content", "review_text", "text"],
    author: &["author", "display_name"],
    date: &["date", "review_date"],
    engagement: &["helpful_votes"],
    has_rating: true,
};

static INSTAGRAM_FIELDS: FieldTable = FieldTable {
    content: &["text", "comment", "content", "node.text"],
    author: &["owner.username", "user.username", "user.name", "author"],
    date: &["taken_at", "created_at", "date"],
    engagement: &["comment_like_count", "like_count"],
    has_rating: false,
};

static REDDIT_FIELDS: FieldTable = FieldTable {
    content: &["data.body", "body", "data.selftext", "selftext", "content", "text"],
    author: &["data.author", "author", "name"],
    date: &["data.created_utc", "created_utc", "created", "date"],
    engagement: &["data.score", "data.ups"],
    has_rating: false,
};

static YOUTUBE_FIELDS: FieldTable = FieldTable {
    content: &["snippet.textDisplay", "textDisplay", "snippet.textOriginal", "textOriginal", "content"],
    author: &["snippet.authorDisplayName", "authorDisplayName", "author"],
    date: &["snippet.publishedAt", "publishedAt", "date"],
    engagement: &["snippet.likeCount", "likeCount"],
    has_rating: false,
};

pub fn field_table(source: Source) -> &'static FieldTable {
    match source {
        Source::Imdb => &IMDB_FIELDS,
        Source::RottenTomatoes => &ROTTEN_TOMATOES_FIELDS,
        Source::Instagram => &INSTAGRAM_FIELDS,
        Source::Reddit => &REDDIT_FIELDS,
        Source::YouTube => &YOUTUBE_FIELDS,
    }
}

/// Walk a dot-separated path through nested objects.
fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = record;
    for key in path.split('.') {
        cur = cur.get(key)?;
    }
    Some(cur)
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string(record: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| lookup(record, p))
        .filter_map(value_to_string)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Parse an engagement value: JSON integers, floats and digit strings all
/// count; negatives and garbage fall through to the next candidate.
fn as_count(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn extract_engagement(record: &Value, table: &FieldTable) -> u64 {
    table
        .engagement
        .iter()
        .chain(ENGAGEMENT_FALLBACK)
        .filter_map(|p| lookup(record, p))
        .find_map(as_count)
        .unwrap_or(0)
}

fn extract_rating(record: &Value) -> Option<Rating> {
    match record.get("rating")? {
        Value::Number(n) => n.as_f64().map(Rating::Score),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if let Ok(num) = s.parse::<f64>() {
                Some(Rating::Score(num))
            } else {
                Some(Rating::Category(s.to_string()))
            }
        }
        _ => None,
    }
}

fn extract_extras(record: &Value) -> BTreeMap<String, Value> {
    let mut extra = BTreeMap::new();
    for (name, paths) in EXTRA_FIELDS {
        if let Some(v) = paths.iter().find_map(|p| lookup(record, p)) {
            if !v.is_null() {
                extra.insert(name.to_string(), v.clone());
            }
        }
    }
    extra
}

/// Map one raw record into the canonical shape. Returns `None` when no
/// usable text content can be extracted; never panics on odd shapes.
pub fn normalize_record(record: &Value, source: Source) -> Option<Review> {
    if !record.is_object() {
        return None;
    }
    let table = field_table(source);
    let content = first_string(record, table.content)?;
    let author = first_string(record, table.author).unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());
    let date = first_string(record, table.date).unwrap_or_default();
    let engagement = extract_engagement(record, table);
    let rating = if table.has_rating {
        extract_rating(record)
    } else {
        None
    };

    Some(Review {
        source,
        content,
        author,
        date,
        rating,
        engagement,
        sentiment: None,
        extra: extract_extras(record),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn youtube_api_shape_normalizes() {
        let record = json!({
            "snippet": {
                "textDisplay": "that engine sound gave me goosebumps",
                "authorDisplayName": "racer99",
                "publishedAt": "2025-05-13T10:00:00Z",
                "likeCount": 42,
                "videoId": "8yh9BPUBbbQ"
            },
            "id": "c-1"
        });
        let r = normalize_record(&record, Source::YouTube).unwrap();
        assert_eq!(r.author, "racer99");
        assert_eq!(r.engagement, 42);
        assert_eq!(r.date, "2025-05-13T10:00:00Z");
        assert_eq!(r.extra.get("video_id").and_then(|v| v.as_str()), Some("8yh9BPUBbbQ"));
    }

    #[test]
    fn reddit_wrapped_data_normalizes() {
        let record = json!({
            "data": {
                "body": "honestly the trailer oversells it",
                "author": "u_skeptic",
                "created_utc": 1747000000,
                "score": 17,
                "subreddit": "F1movie"
            }
        });
        let r = normalize_record(&record, Source::Reddit).unwrap();
        assert_eq!(r.content, "honestly the trailer oversells it");
        assert_eq!(r.author, "u_skeptic");
        assert_eq!(r.engagement, 17);
        assert_eq!(r.date, "1747000000");
        assert_eq!(r.extra.get("subreddit").and_then(|v| v.as_str()), Some("F1movie"));
    }

    #[test]
    fn instagram_nested_owner_and_string_likes() {
        let record = json!({
            "text": "chills every single time",
            "owner": { "username": "film.fan" },
            "comment_like_count": "156",
            "taken_at": 1747001234
        });
        let r = normalize_record(&record, Source::Instagram).unwrap();
        assert_eq!(r.author, "film.fan");
        assert_eq!(r.engagement, 156);
    }

    #[test]
    fn canonical_record_still_normalizes() {
        // already-flat record with a generic `likes` field
        let record = json!({ "content": "This movie is insane, loved it!!", "likes": 50 });
        let r = normalize_record(&record, Source::YouTube).unwrap();
        assert_eq!(r.engagement, 50);
        assert_eq!(r.author, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn rating_shapes() {
        let imdb = json!({ "content": "ok", "rating": 8 });
        assert_eq!(
            normalize_record(&imdb, Source::Imdb).unwrap().rating,
            Some(Rating::Score(8.0))
        );
        let rt = json!({ "content": "ok", "rating": "Fresh" });
        assert_eq!(
            normalize_record(&rt, Source::RottenTomatoes).unwrap().rating,
            Some(Rating::Category("Fresh".into()))
        );
        let rt_num = json!({ "content": "ok", "rating": "4.5" });
        assert_eq!(
            normalize_record(&rt_num, Source::RottenTomatoes).unwrap().rating,
            Some(Rating::Score(4.5))
        );
    }

    #[test]
    fn unparseable_engagement_defaults_to_zero() {
        let record = json!({ "content": "fine I guess", "helpful_votes": "a few" });
        let r = normalize_record(&record, Source::Imdb).unwrap();
        assert_eq!(r.engagement, 0);
    }

    #[test]
    fn empty_content_is_discarded() {
        for record in [
            json!({ "content": "   " }),
            json!({ "author": "ghost" }),
            json!("not an object"),
        ] {
            assert!(normalize_record(&record, Source::Imdb).is_none());
        }
    }
}
