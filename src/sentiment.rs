//! Lexicon-based valence scorer for short social/review text.
//!
//! Word-level polarities from the lexicon are adjusted by local context
//! (negation, degree boosters, ALL-CAPS emphasis, but-clauses) and by
//! punctuation emphasis, then collapsed into the four-component score via
//! the saturating normalization `s / sqrt(s^2 + 15)`. Scoring is a pure
//! function of content for a fixed lexicon; the analyzer is constructed
//! once per pipeline run and passed into the stages that need it.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::lexicon::{Lexicon, BOOSTERS, NEGATIONS};
use crate::models::{Review, SentimentLabel, SentimentScore};

/// Label thresholds. Fixed design constants, not configurable.
pub const POS_THRESHOLD: f64 = 0.05;
pub const NEG_THRESHOLD: f64 = -0.05;

const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

/// Discrete label as a total function of the compound score.
pub fn label_for(compound: f64) -> SentimentLabel {
    if compound >= POS_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEG_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn neutral_score() -> SentimentScore {
    SentimentScore {
        neg: 0.0,
        neu: 1.0,
        pos: 0.0,
        compound: 0.0,
        label: SentimentLabel::Neutral,
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn normalize_score(score: f64) -> f64 {
    let norm = score / (score * score + NORMALIZE_ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| w.chars().count() > 1)
        .map(|w| w.to_string())
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    let mut has_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha && word.chars().count() > 1
}

/// Caps emphasis only applies when the text mixes cased and ALL-CAPS words.
fn allcap_differential(tokens: &[String]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm = text.matches('?').count();
    let qm_amp = if qm > 1 {
        if qm <= 3 {
            qm as f64 * 0.18
        } else {
            0.96
        }
    } else {
        0.0
    };
    ep + qm_amp
}

pub struct SentimentAnalyzer {
    lexicon: Lexicon,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl SentimentAnalyzer {
    /// Lexicon augmentation (the hype overlay) already happened inside
    /// `Lexicon`; construction here just freezes the modifier tables.
    pub fn new(lexicon: Lexicon) -> Self {
        debug!("Sentiment analyzer constructed - lexicon_entries={}", lexicon.len());
        SentimentAnalyzer {
            lexicon,
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return neutral_score();
        }
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return neutral_score();
        }
        let cap_diff = allcap_differential(&tokens);
        let mut sentiments: Vec<f64> = (0..tokens.len())
            .map(|i| self.valence_at(&tokens, i, cap_diff))
            .collect();
        but_check(&tokens, &mut sentiments);
        self.score_valence(&sentiments, text)
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.contains("n't")
    }

    fn valence_at(&self, tokens: &[String], i: usize, cap_diff: bool) -> f64 {
        let token = &tokens[i];
        let lower = token.to_lowercase();
        // boosters carry no valence of their own
        if self.boosters.contains_key(lower.as_str()) {
            return 0.0;
        }
        if lower == "kind" && tokens.get(i + 1).map(|t| t.to_lowercase()).as_deref() == Some("of")
        {
            return 0.0;
        }
        let Some(mut valence) = self.lexicon.get(&lower) else {
            return 0.0;
        };
        if cap_diff && is_all_caps(token) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        // walk up to three preceding tokens for boosters and negations,
        // damping with distance
        for start_i in 0..3 {
            if i <= start_i {
                break;
            }
            let prev_raw = &tokens[i - (start_i + 1)];
            if self.lexicon.contains(&prev_raw.to_lowercase()) {
                continue;
            }
            let mut s = self.scalar_inc_dec(prev_raw, valence, cap_diff);
            if s != 0.0 {
                if start_i == 1 {
                    s *= 0.95;
                }
                if start_i == 2 {
                    s *= 0.9;
                }
            }
            valence += s;
            valence = self.negation_check(valence, tokens, start_i, i);
        }
        self.least_check(valence, tokens, i)
    }

    fn scalar_inc_dec(&self, word: &str, valence: f64, cap_diff: bool) -> f64 {
        let lower = word.to_lowercase();
        let Some(&boost) = self.boosters.get(lower.as_str()) else {
            return 0.0;
        };
        let mut scalar = boost;
        if valence < 0.0 {
            scalar = -scalar;
        }
        if cap_diff && is_all_caps(word) {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }

    fn negation_check(&self, valence: f64, tokens: &[String], start_i: usize, i: usize) -> f64 {
        let prev = |k: usize| tokens[i - k].to_lowercase();
        match start_i {
            0 => {
                if self.is_negation(&prev(1)) {
                    valence * N_SCALAR
                } else {
                    valence
                }
            }
            1 => {
                if prev(2) == "never" && (prev(1) == "so" || prev(1) == "this") {
                    valence * 1.25
                } else if prev(2) == "without" && prev(1) == "doubt" {
                    valence
                } else if self.is_negation(&prev(2)) {
                    valence * N_SCALAR
                } else {
                    valence
                }
            }
            _ => {
                if prev(3) == "never"
                    && (prev(2) == "so" || prev(2) == "this" || prev(1) == "so" || prev(1) == "this")
                {
                    valence * 1.25
                } else if prev(3) == "without" && (prev(2) == "doubt" || prev(1) == "doubt") {
                    valence
                } else if self.is_negation(&prev(3)) {
                    valence * N_SCALAR
                } else {
                    valence
                }
            }
        }
    }

    fn least_check(&self, valence: f64, tokens: &[String], i: usize) -> f64 {
        if i > 1 {
            let p1 = tokens[i - 1].to_lowercase();
            if !self.lexicon.contains(&p1) && p1 == "least" {
                let p2 = tokens[i - 2].to_lowercase();
                if p2 != "at" && p2 != "very" {
                    return valence * N_SCALAR;
                }
            }
        } else if i > 0 {
            let p1 = tokens[i - 1].to_lowercase();
            if !self.lexicon.contains(&p1) && p1 == "least" {
                return valence * N_SCALAR;
            }
        }
        valence
    }

    fn score_valence(&self, sentiments: &[f64], text: &str) -> SentimentScore {
        if sentiments.is_empty() {
            return neutral_score();
        }
        let mut sum_s: f64 = sentiments.iter().sum();
        let punct = punctuation_emphasis(text);
        if sum_s > 0.0 {
            sum_s += punct;
        } else if sum_s < 0.0 {
            sum_s -= punct;
        }
        let compound = normalize_score(sum_s);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &s in sentiments {
            if s > 0.0 {
                pos_sum += s + 1.0;
            } else if s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += punct;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punct;
        }
        let total = pos_sum + neg_sum.abs() + neu_count;
        let (neg, neu, pos) = if total > 0.0 {
            (neg_sum.abs() / total, neu_count / total, pos_sum / total)
        } else {
            (0.0, 1.0, 0.0)
        };

        SentimentScore {
            neg: round3(neg),
            neu: round3(neu),
            pos: round3(pos),
            compound: round3(compound),
            label: label_for(compound),
        }
    }
}

/// Half of an "A but B" sentence outweighs the other: everything before the
/// "but" is halved, everything after is amplified.
fn but_check(tokens: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = tokens.iter().position(|t| t.to_lowercase() == "but") else {
        return;
    };
    for (si, s) in sentiments.iter_mut().enumerate() {
        if si < but_idx {
            *s *= 0.5;
        } else if si > but_idx {
            *s *= 1.5;
        }
    }
}

/// Score a whole collection, producing a new collection with the result
/// attached. Per-review scoring is independent, so the map runs on the
/// rayon pool; output order matches input order.
pub fn score_reviews(analyzer: &SentimentAnalyzer, reviews: &[Review]) -> Vec<Review> {
    reviews
        .par_iter()
        .map(|r| {
            let mut scored = r.clone();
            scored.sentiment = Some(analyzer.polarity_scores(&r.content));
            scored
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(Lexicon::builtin())
    }

    #[test]
    fn label_rule_is_total_and_exhaustive() {
        assert_eq!(label_for(0.05), SentimentLabel::Positive);
        assert_eq!(label_for(-0.05), SentimentLabel::Negative);
        assert_eq!(label_for(0.0), SentimentLabel::Neutral);
        assert_eq!(label_for(0.049), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.049), SentimentLabel::Neutral);
        assert_eq!(label_for(1.0), SentimentLabel::Positive);
        assert_eq!(label_for(-1.0), SentimentLabel::Negative);
    }

    #[test]
    fn empty_input_is_neutral_not_an_error() {
        let a = analyzer();
        for text in ["", "   ", "\n\t"] {
            let s = a.polarity_scores(text);
            assert_eq!(s.neg, 0.0);
            assert_eq!(s.neu, 1.0);
            assert_eq!(s.pos, 0.0);
            assert_eq!(s.compound, 0.0);
            assert_eq!(s.label, SentimentLabel::Neutral);
        }
    }

    #[test]
    fn hype_vocabulary_scores_positive() {
        let a = analyzer();
        let s = a.polarity_scores("This movie is insane, loved it!!");
        assert!(s.compound > POS_THRESHOLD, "compound={}", s.compound);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn negation_flips_polarity() {
        let a = analyzer();
        let plain = a.polarity_scores("This is good");
        let negated = a.polarity_scores("This is not good at all");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < NEG_THRESHOLD, "compound={}", negated.compound);
    }

    #[test]
    fn boosters_scale_intensity() {
        let a = analyzer();
        let base = a.polarity_scores("The pacing was good");
        let boosted = a.polarity_scores("The pacing was very good");
        let dampened = a.polarity_scores("The pacing was slightly good");
        assert!(boosted.compound > base.compound);
        assert!(dampened.compound < base.compound);
    }

    #[test]
    fn caps_and_exclamations_amplify() {
        let a = analyzer();
        let plain = a.polarity_scores("great soundtrack");
        let caps = a.polarity_scores("GREAT soundtrack");
        let bangs = a.polarity_scores("great soundtrack!!!");
        assert!(caps.compound > plain.compound);
        assert!(bangs.compound > plain.compound);
    }

    #[test]
    fn but_clause_outweighs_lead_in() {
        let a = analyzer();
        let s = a.polarity_scores("The visuals were good but the story was terrible");
        assert!(s.compound < 0.0, "compound={}", s.compound);
    }

    #[test]
    fn proportions_sum_to_one() {
        let a = analyzer();
        let s = a.polarity_scores("Loved the racing scenes, hated the dialogue");
        let sum = s.neg + s.neu + s.pos;
        assert!((sum - 1.0).abs() < 0.01, "sum={sum}");
    }

    #[test]
    fn scoring_is_deterministic_and_order_preserving() {
        let a = analyzer();
        let mk = |content: &str| Review {
            source: Source::Reddit,
            content: content.to_string(),
            author: "u".into(),
            date: String::new(),
            rating: None,
            engagement: 0,
            sentiment: None,
            extra: Default::default(),
        };
        let reviews = vec![mk("absolutely loved it"), mk("total waste of time"), mk("it exists")];
        let scored_a = score_reviews(&a, &reviews);
        let scored_b = score_reviews(&a, &reviews);
        for (x, y) in scored_a.iter().zip(&scored_b) {
            assert_eq!(x.sentiment, y.sentiment);
            assert_eq!(x.content, y.content);
        }
        assert_eq!(scored_a[0].label(), SentimentLabel::Positive);
        assert_eq!(scored_a[1].label(), SentimentLabel::Negative);
    }
}
