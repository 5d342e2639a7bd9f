//! Lexical/Thematic Analysis Engine: why a sentiment class looks the way it
//! does. Tokenizes with the social stop-word set (heavy cleaning lives here
//! and only here), counts words and bigrams both raw and engagement-weighted,
//! extracts terms distinctive to one label versus the other, and picks
//! representative quotes.

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use crate::models::{Review, SentimentLabel};
use crate::stopwords::{is_reference_bigram, social_stop_words};

pub const TOP_N_WORDS: usize = 25;
pub const TOP_N_BIGRAMS: usize = 20;
pub const TOP_N_QUOTES: usize = 5;
/// Pool size for the top-K set difference. Must be the same on both sides.
pub const DISTINCTIVE_POOL: usize = 50;
pub const DISTINCTIVE_LIMIT: usize = 15;
pub const QUOTE_MIN_CHARS: usize = 20;
pub const QUOTE_MAX_CHARS: usize = 200;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]{3,}").unwrap())
}

/// Alphabetic tokens of length >= 3, lowercased, stop words removed.
/// URL/markdown noise is assumed already stripped by light cleaning; the
/// stop set catches leftover scheme fragments anyway.
pub fn tokenize(text: &str) -> Vec<String> {
    let stop = social_stop_words();
    token_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !stop.contains(w.as_str()))
        .collect()
}

/// Adjacent token pairs after the same filtering as `tokenize`.
pub fn bigrams(text: &str) -> Vec<(String, String)> {
    tokenize(text).into_iter().tuple_windows().collect()
}

/// Parallel raw and engagement-weighted counters over one term vocabulary.
/// Weight is `1 + engagement` so zero-engagement content still counts once.
#[derive(Debug, Default, Clone)]
pub struct TermCounts {
    raw: HashMap<String, u64>,
    weighted: HashMap<String, u64>,
}

impl TermCounts {
    pub fn add(&mut self, term: &str, engagement: u64) {
        *self.raw.entry(term.to_string()).or_insert(0) += 1;
        *self.weighted.entry(term.to_string()).or_insert(0) += 1 + engagement;
    }

    pub fn raw_count(&self, term: &str) -> u64 {
        self.raw.get(term).copied().unwrap_or(0)
    }

    fn sorted_desc(map: &HashMap<String, u64>) -> Vec<(&str, u64)> {
        let mut items: Vec<(&str, u64)> = map.iter().map(|(t, &c)| (t.as_str(), c)).collect();
        // count descending, then term ascending, so rankings are deterministic
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    pub fn top_raw(&self, n: usize) -> Vec<(&str, u64)> {
        let mut v = Self::sorted_desc(&self.raw);
        v.truncate(n);
        v
    }

    pub fn top_weighted(&self, n: usize) -> Vec<(&str, u64)> {
        let mut v = Self::sorted_desc(&self.weighted);
        v.truncate(n);
        v
    }

    /// Top terms by raw count with their weighted counts and the
    /// per-100-reviews rate alongside.
    pub fn top_stats(&self, n: usize, group_size: usize) -> Vec<TermStat> {
        self.top_raw(n)
            .into_iter()
            .map(|(term, count)| TermStat {
                term: term.to_string(),
                count,
                weighted_count: self.weighted.get(term).copied().unwrap_or(0),
                per_100_reviews: per_100(count, group_size),
            })
            .collect()
    }

    /// Same rows ranked by the weighted counter instead.
    pub fn top_stats_weighted(&self, n: usize, group_size: usize) -> Vec<TermStat> {
        self.top_weighted(n)
            .into_iter()
            .map(|(term, weighted_count)| TermStat {
                term: term.to_string(),
                count: self.raw_count(term),
                weighted_count,
                per_100_reviews: per_100(self.raw_count(term), group_size),
            })
            .collect()
    }
}

fn per_100(count: u64, group_size: usize) -> f64 {
    if group_size == 0 {
        0.0
    } else {
        round1(100.0 * count as f64 / group_size as f64)
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermStat {
    pub term: String,
    pub count: u64,
    pub weighted_count: u64,
    pub per_100_reviews: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub source: String,
    pub engagement: u64,
}

/// Top-K set difference: terms in A's top pool that B's top pool lacks,
/// ranked by A's raw frequency. Order-sensitive to the pool size, so the
/// same K is used on both sides.
pub fn distinctive_terms(a: &TermCounts, b: &TermCounts, limit: usize) -> Vec<String> {
    let pool_a: Vec<&str> = a.top_raw(DISTINCTIVE_POOL).into_iter().map(|(t, _)| t).collect();
    let pool_b: HashSet<&str> = b.top_raw(DISTINCTIVE_POOL).into_iter().map(|(t, _)| t).collect();
    let mut distinct: Vec<&str> = pool_a.into_iter().filter(|t| !pool_b.contains(t)).collect();
    distinct.sort_by(|x, y| {
        a.raw_count(y)
            .cmp(&a.raw_count(x))
            .then_with(|| x.cmp(y))
    });
    distinct.truncate(limit);
    distinct.into_iter().map(|t| t.to_string()).collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Rank candidates by `(engagement, content length)` descending and take the
/// top N, truncating displayed content.
pub fn pick_quotes(reviews: &[&Review], n: usize) -> Vec<Quote> {
    let mut candidates: Vec<&&Review> = reviews
        .iter()
        .filter(|r| r.content.chars().count() > QUOTE_MIN_CHARS)
        .collect();
    candidates.sort_by(|a, b| {
        (b.engagement, b.content.chars().count())
            .cmp(&(a.engagement, a.content.chars().count()))
    });
    candidates
        .into_iter()
        .take(n)
        .map(|r| Quote {
            content: truncate_chars(&r.content, QUOTE_MAX_CHARS),
            source: r.source.name().to_string(),
            engagement: r.engagement,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThematicSummary {
    pub total_analyzed: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub pct_positive: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelThemes {
    pub top_words: Vec<TermStat>,
    pub top_words_weighted: Vec<TermStat>,
    pub top_bigrams: Vec<TermStat>,
    /// Empty for the neutral block (no opposite class to diff against).
    pub distinctive_terms: Vec<String>,
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceThemes {
    pub count: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub top_words: Vec<TermStat>,
    pub top_words_weighted: Vec<TermStat>,
}

/// Whole-collection frequency block, no label split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallThemes {
    pub top_words: Vec<TermStat>,
    pub top_words_weighted: Vec<TermStat>,
    pub top_bigrams: Vec<TermStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThematicReport {
    pub summary: ThematicSummary,
    pub overall: OverallThemes,
    pub why_positive: LabelThemes,
    pub why_negative: LabelThemes,
    pub why_neutral: LabelThemes,
    pub by_source: BTreeMap<String, SourceThemes>,
}

#[derive(Default)]
struct GroupCounts {
    reviews: Vec<usize>,
    words: TermCounts,
    bigrams: TermCounts,
}

/// Build the full thematic breakdown from a scored collection. Reviews
/// without a score group as neutral.
pub fn build_thematic_report(reviews: &[Review]) -> ThematicReport {
    let mut overall = GroupCounts::default();
    let mut by_label: HashMap<SentimentLabel, GroupCounts> = HashMap::new();
    let mut by_source: BTreeMap<String, GroupCounts> = BTreeMap::new();
    let mut label_counts: HashMap<SentimentLabel, usize> = HashMap::new();

    for (idx, r) in reviews.iter().enumerate() {
        let label = r.label();
        *label_counts.entry(label).or_insert(0) += 1;

        let label_group = by_label.entry(label).or_default();
        label_group.reviews.push(idx);
        let source_group = by_source.entry(r.source.name().to_string()).or_default();
        source_group.reviews.push(idx);

        for w in tokenize(&r.content) {
            overall.words.add(&w, r.engagement);
            label_group.words.add(&w, r.engagement);
            source_group.words.add(&w, r.engagement);
        }
        for (a, b) in bigrams(&r.content) {
            let joined = format!("{a} {b}");
            overall.bigrams.add(&joined, r.engagement);
            source_group.bigrams.add(&joined, r.engagement);
            // reference bigrams describe the subject, not the opinion;
            // keep them out of the per-label "why" lists only
            if !is_reference_bigram(&a, &b) {
                label_group.bigrams.add(&joined, r.engagement);
            }
        }
    }

    let count_of = |label| label_counts.get(&label).copied().unwrap_or(0);
    let total = reviews.len();
    let summary = ThematicSummary {
        total_analyzed: total,
        positive: count_of(SentimentLabel::Positive),
        neutral: count_of(SentimentLabel::Neutral),
        negative: count_of(SentimentLabel::Negative),
        pct_positive: if total == 0 {
            0.0
        } else {
            round1(100.0 * count_of(SentimentLabel::Positive) as f64 / total as f64)
        },
    };

    let empty = GroupCounts::default();
    let group = |label: SentimentLabel| by_label.get(&label).unwrap_or(&empty);

    let label_block = |label: SentimentLabel, opposite: Option<SentimentLabel>| {
        let g = group(label);
        let n = g.reviews.len();
        let members: Vec<&Review> = g.reviews.iter().map(|&i| &reviews[i]).collect();
        LabelThemes {
            top_words: g.words.top_stats(TOP_N_WORDS, n),
            top_words_weighted: g.words.top_stats_weighted(TOP_N_WORDS, n),
            top_bigrams: g.bigrams.top_stats(TOP_N_BIGRAMS, n),
            distinctive_terms: opposite
                .map(|opp| distinctive_terms(&g.words, &group(opp).words, DISTINCTIVE_LIMIT))
                .unwrap_or_default(),
            quotes: pick_quotes(&members, TOP_N_QUOTES),
        }
    };

    let why_positive = label_block(SentimentLabel::Positive, Some(SentimentLabel::Negative));
    let why_negative = label_block(SentimentLabel::Negative, Some(SentimentLabel::Positive));
    let why_neutral = label_block(SentimentLabel::Neutral, None);

    let by_source = by_source
        .into_iter()
        .map(|(name, g)| {
            let n = g.reviews.len();
            let mut pos = 0;
            let mut neu = 0;
            let mut neg = 0;
            for &i in &g.reviews {
                match reviews[i].label() {
                    SentimentLabel::Positive => pos += 1,
                    SentimentLabel::Neutral => neu += 1,
                    SentimentLabel::Negative => neg += 1,
                }
            }
            let themes = SourceThemes {
                count: n,
                positive: pos,
                neutral: neu,
                negative: neg,
                top_words: g.words.top_stats(15, n),
                top_words_weighted: g.words.top_stats_weighted(15, n),
            };
            (name, themes)
        })
        .collect();

    ThematicReport {
        summary,
        overall: OverallThemes {
            top_words: overall.words.top_stats(TOP_N_WORDS, total),
            top_words_weighted: overall.words.top_stats_weighted(TOP_N_WORDS, total),
            top_bigrams: overall.bigrams.top_stats(TOP_N_BIGRAMS, total),
        },
        why_positive,
        why_negative,
        why_neutral,
        by_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SentimentScore, Source};

    fn scored(content: &str, engagement: u64, compound: f64) -> Review {
        Review {
            source: Source::YouTube,
            content: content.to_string(),
            author: "a".into(),
            date: String::new(),
            rating: None,
            engagement,
            sentiment: Some(SentimentScore {
                neg: 0.0,
                neu: 0.0,
                pos: 0.0,
                compound,
                label: crate::sentiment::label_for(compound),
            }),
            extra: Default::default(),
        }
    }

    #[test]
    fn tokenizer_filters_stop_words_and_short_tokens() {
        let toks = tokenize("the soundtrack is an absolute triumph ok 12 yo");
        assert!(toks.contains(&"soundtrack".to_string()));
        assert!(toks.contains(&"triumph".to_string()));
        assert!(!toks.contains(&"the".to_string()));
        assert!(!toks.contains(&"is".to_string()));
        assert!(!toks.iter().any(|t| t.chars().count() < 3));
    }

    #[test]
    fn engagement_weighting_counts_zero_as_one() {
        let mut counts = TermCounts::default();
        counts.add("soundtrack", 0);
        counts.add("soundtrack", 99);
        assert_eq!(counts.raw_count("soundtrack"), 2);
        assert_eq!(counts.top_weighted(1)[0], ("soundtrack", 101));
    }

    #[test]
    fn weighted_and_raw_rankings_are_independent() {
        let mut counts = TermCounts::default();
        counts.add("common", 0);
        counts.add("common", 0);
        counts.add("viral", 500);
        assert_eq!(counts.top_raw(1)[0].0, "common");
        assert_eq!(counts.top_weighted(1)[0].0, "viral");
    }

    #[test]
    fn distinctive_terms_are_a_ranked_set_difference() {
        let mut a = TermCounts::default();
        let mut b = TermCounts::default();
        for _ in 0..5 {
            a.add("soundtrack", 0);
        }
        for _ in 0..3 {
            a.add("visuals", 0);
        }
        a.add("shared", 0);
        b.add("shared", 0);
        b.add("plot", 0);
        let distinct = distinctive_terms(&a, &b, 10);
        assert_eq!(distinct, vec!["soundtrack".to_string(), "visuals".to_string()]);
    }

    #[test]
    fn quotes_rank_by_engagement_then_length() {
        let short_popular = scored("a punchy and popular take on it", 50, 0.5);
        let long_popular = scored("a much longer and equally popular take on the film overall", 50, 0.5);
        let unpopular = scored("a long unpopular rambling comment about everything", 0, 0.5);
        let tiny = scored("too short", 999, 0.5);
        let all = [&long_popular, &short_popular, &unpopular, &tiny];
        let quotes = pick_quotes(&all.to_vec(), 2);
        assert_eq!(quotes.len(), 2);
        assert!(quotes[0].content.starts_with("a much longer"));
        assert!(quotes[1].content.starts_with("a punchy"));
    }

    #[test]
    fn reference_bigrams_excluded_from_label_lists_only() {
        let reviews = vec![scored("brad pitt delivers stunning racing drama", 0, 0.6)];
        let report = build_thematic_report(&reviews);
        let label_bigrams: Vec<&str> = report
            .why_positive
            .top_bigrams
            .iter()
            .map(|t| t.term.as_str())
            .collect();
        assert!(!label_bigrams.contains(&"brad pitt"));
        assert!(label_bigrams.contains(&"pitt delivers"));
        // generic counts keep the reference pair
        assert!(report.overall.top_bigrams.iter().any(|t| t.term == "brad pitt"));
    }

    #[test]
    fn empty_collection_yields_zeroed_report() {
        let report = build_thematic_report(&[]);
        assert_eq!(report.summary.total_analyzed, 0);
        assert_eq!(report.summary.pct_positive, 0.0);
        assert!(report.overall.top_words.is_empty());
        assert!(report.why_positive.top_words.is_empty());
        assert!(report.by_source.is_empty());
    }
}
