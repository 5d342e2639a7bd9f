//! Aggregator/Reporter: pure functions from the cleaned (and scored)
//! collection to the summary structures the reporting layer consumes.
//! Every division tolerates empty groups and zero engagement with explicit
//! zero/neutral defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Review, SentimentLabel};
use crate::sentiment::label_for;
use crate::thematic::{tokenize, TermCounts, TermStat};

const TOP_WORDS_PER_SOURCE: usize = 25;
const SAMPLE_TEXTS_PER_SOURCE: usize = 5;
const SAMPLE_TEXT_MAX_CHARS: usize = 300;
const SAMPLE_TEXT_MIN_CHARS: usize = 20;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(100.0 * part as f64 / whole as f64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    pub fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn dominant(&self) -> SentimentLabel {
        // positive > neutral > negative on ties, matching label order
        let mut best = SentimentLabel::Positive;
        for label in SentimentLabel::ALL {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }
}

/// Volume/engagement overview, no sentiment required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInsights {
    pub total_reviews: usize,
    pub by_source: BTreeMap<String, usize>,
    pub avg_content_length: f64,
    pub min_content_length: usize,
    pub max_content_length: usize,
    pub total_engagement: u64,
    pub engagement_by_source: BTreeMap<String, u64>,
    pub avg_engagement_per_review: f64,
}

pub fn basic_insights(reviews: &[Review]) -> BasicInsights {
    let mut by_source = BTreeMap::new();
    let mut engagement_by_source = BTreeMap::new();
    let mut lengths = Vec::with_capacity(reviews.len());
    let mut total_engagement = 0u64;

    for r in reviews {
        *by_source.entry(r.source.name().to_string()).or_insert(0usize) += 1;
        *engagement_by_source
            .entry(r.source.name().to_string())
            .or_insert(0u64) += r.engagement;
        total_engagement += r.engagement;
        lengths.push(r.content.chars().count());
    }

    let avg_len = if lengths.is_empty() {
        0.0
    } else {
        round1(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
    };

    BasicInsights {
        total_reviews: reviews.len(),
        by_source,
        avg_content_length: avg_len,
        min_content_length: lengths.iter().min().copied().unwrap_or(0),
        max_content_length: lengths.iter().max().copied().unwrap_or(0),
        total_engagement,
        engagement_by_source,
        avg_engagement_per_review: if reviews.is_empty() {
            0.0
        } else {
            round1(total_engagement as f64 / reviews.len() as f64)
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSentiment {
    pub count: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub avg_compound: f64,
}

/// Engagement share per label: which sentiment class the audience reach
/// actually attaches to. A separate signal from review-count share, since a
/// few high-engagement items can dominate perceived sentiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementBreakdown {
    pub total_engagement: u64,
    pub engagement_by_label: BTreeMap<String, u64>,
    pub pct_engagement_positive: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentInsights {
    pub total_reviews: usize,
    pub by_label: LabelCounts,
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
    pub avg_compound: f64,
    /// Mean compound weighted by `1 + engagement`.
    pub avg_compound_weighted: f64,
    pub overall_label: SentimentLabel,
    pub by_source: BTreeMap<String, SourceSentiment>,
    pub engagement: EngagementBreakdown,
}

pub fn sentiment_insights(reviews: &[Review]) -> SentimentInsights {
    let mut by_label = LabelCounts::default();
    let mut by_source: BTreeMap<String, (SourceSentiment, f64)> = BTreeMap::new();
    let mut engagement_by_label: BTreeMap<String, u64> = SentimentLabel::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), 0u64))
        .collect();

    let mut compound_sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut total_engagement = 0u64;

    for r in reviews {
        let label = r.label();
        let compound = r.sentiment.as_ref().map(|s| s.compound).unwrap_or(0.0);
        let weight = 1.0 + r.engagement as f64;

        by_label.bump(label);
        compound_sum += compound;
        weighted_sum += compound * weight;
        weight_total += weight;
        total_engagement += r.engagement;
        *engagement_by_label
            .entry(label.as_str().to_string())
            .or_insert(0) += r.engagement;

        let entry = by_source
            .entry(r.source.name().to_string())
            .or_insert_with(|| {
                (
                    SourceSentiment {
                        count: 0,
                        positive: 0,
                        neutral: 0,
                        negative: 0,
                        avg_compound: 0.0,
                    },
                    0.0,
                )
            });
        entry.0.count += 1;
        match label {
            SentimentLabel::Positive => entry.0.positive += 1,
            SentimentLabel::Neutral => entry.0.neutral += 1,
            SentimentLabel::Negative => entry.0.negative += 1,
        }
        entry.1 += compound;
    }

    let total = reviews.len();
    let avg_compound = if total == 0 {
        0.0
    } else {
        compound_sum / total as f64
    };
    let avg_compound_weighted = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        avg_compound
    };
    let positive_engagement = engagement_by_label
        .get(SentimentLabel::Positive.as_str())
        .copied()
        .unwrap_or(0);

    SentimentInsights {
        total_reviews: total,
        pct_positive: pct(by_label.positive, total),
        pct_neutral: pct(by_label.neutral, total),
        pct_negative: pct(by_label.negative, total),
        avg_compound: round3(avg_compound),
        avg_compound_weighted: round3(avg_compound_weighted),
        overall_label: label_for(avg_compound),
        by_source: by_source
            .into_iter()
            .map(|(name, (mut metrics, compound_sum))| {
                metrics.avg_compound = if metrics.count == 0 {
                    0.0
                } else {
                    round3(compound_sum / metrics.count as f64)
                };
                (name, metrics)
            })
            .collect(),
        engagement: EngagementBreakdown {
            total_engagement,
            engagement_by_label,
            pct_engagement_positive: if total_engagement == 0 {
                0.0
            } else {
                round1(100.0 * positive_engagement as f64 / total_engagement as f64)
            },
        },
        by_label,
    }
}

/// Full per-source metrics block. Every absolute statistic carries a
/// normalized counterpart so sources of different volume compare fairly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub count: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
    pub avg_compound: f64,
    pub dominant_label: SentimentLabel,
    pub engagement_total: u64,
    pub engagement_per_review: f64,
    pub top_words: Vec<TermStat>,
    pub top_words_weighted: Vec<TermStat>,
    pub sample_positive: Vec<String>,
    pub sample_negative: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub total_reviews: usize,
    pub sources: Vec<String>,
    pub by_source: BTreeMap<String, SourceMetrics>,
}

#[derive(Default)]
struct SourceAccum {
    labels: LabelCounts,
    compound_sum: f64,
    engagement_total: u64,
    words: TermCounts,
    sample_positive: Vec<String>,
    sample_negative: Vec<String>,
    count: usize,
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn source_report(reviews: &[Review]) -> SourceReport {
    let mut accum: BTreeMap<String, SourceAccum> = BTreeMap::new();

    for r in reviews {
        let a = accum.entry(r.source.name().to_string()).or_default();
        let label = r.label();
        a.count += 1;
        a.labels.bump(label);
        a.compound_sum += r.sentiment.as_ref().map(|s| s.compound).unwrap_or(0.0);
        a.engagement_total += r.engagement;
        for w in tokenize(&r.content) {
            a.words.add(&w, r.engagement);
        }
        if r.content.chars().count() > SAMPLE_TEXT_MIN_CHARS {
            let sample = truncate_chars(&r.content, SAMPLE_TEXT_MAX_CHARS);
            match label {
                SentimentLabel::Positive if a.sample_positive.len() < SAMPLE_TEXTS_PER_SOURCE => {
                    a.sample_positive.push(sample)
                }
                SentimentLabel::Negative if a.sample_negative.len() < SAMPLE_TEXTS_PER_SOURCE => {
                    a.sample_negative.push(sample)
                }
                _ => {}
            }
        }
    }

    let by_source: BTreeMap<String, SourceMetrics> = accum
        .into_iter()
        .map(|(name, a)| {
            let n = a.count;
            let metrics = SourceMetrics {
                count: n,
                positive: a.labels.positive,
                neutral: a.labels.neutral,
                negative: a.labels.negative,
                pct_positive: pct(a.labels.positive, n),
                pct_neutral: pct(a.labels.neutral, n),
                pct_negative: pct(a.labels.negative, n),
                avg_compound: if n == 0 {
                    0.0
                } else {
                    round3(a.compound_sum / n as f64)
                },
                dominant_label: a.labels.dominant(),
                engagement_total: a.engagement_total,
                engagement_per_review: if n == 0 {
                    0.0
                } else {
                    round1(a.engagement_total as f64 / n as f64)
                },
                top_words: a.words.top_stats(TOP_WORDS_PER_SOURCE, n),
                top_words_weighted: a.words.top_stats_weighted(TOP_WORDS_PER_SOURCE, n),
                sample_positive: a.sample_positive,
                sample_negative: a.sample_negative,
            };
            (name, metrics)
        })
        .collect();

    SourceReport {
        total_reviews: reviews.len(),
        sources: by_source.keys().cloned().collect(),
        by_source,
    }
}
