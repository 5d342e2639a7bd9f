//! Pipeline orchestration over the flat-file stage layout:
//! `data/raw/` → `data/clean/` → `output/insights/`. Each stage fully
//! materializes its output before the next starts; analysis stages require
//! the clean dataset on disk and fail fast when it is missing. The sentiment
//! capability is checked once per run; when the lexicon is unavailable the
//! dependent stages emit structured `unavailable` results and everything
//! else still runs.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::clean::{clean_reviews, CleanOptions};
use crate::ingest::load_raw_reviews;
use crate::insights::{basic_insights, sentiment_insights, source_report, SentimentInsights, SourceReport};
use crate::lexicon::Lexicon;
use crate::models::{Analysis, ReviewDataset};
use crate::render::{render_source_report, render_thematic_report};
use crate::sentiment::{score_reviews, SentimentAnalyzer};
use crate::thematic::{build_thematic_report, ThematicReport};

pub const CLEAN_FILE: &str = "reviews_clean.json";
pub const BASIC_INSIGHTS_FILE: &str = "basic_insights.json";
pub const SCORED_REVIEWS_FILE: &str = "reviews_with_sentiment.json";
pub const SENTIMENT_INSIGHTS_FILE: &str = "sentiment_insights.json";
pub const THEMATIC_FILE: &str = "thematic_analysis.json";
pub const SOURCE_REPORT_FILE: &str = "sentiment_by_source.json";
pub const SOURCE_REPORT_MD: &str = "report_sources.md";
pub const THEMATIC_MD: &str = "report_thematic.md";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root holding `raw/` and `clean/`.
    pub data_dir: PathBuf,
    /// Insight JSONs and markdown reports land here.
    pub output_dir: PathBuf,
    pub subject: String,
    pub clean: CleanOptions,
    /// Replacement base lexicon; `None` uses the embedded one.
    pub lexicon_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn clean_dir(&self) -> PathBuf {
        self.data_dir.join("clean")
    }

    pub fn clean_file(&self) -> PathBuf {
        self.clean_dir().join(CLEAN_FILE)
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339()
}

fn write_json<T: ?Sized + Serialize>(path: &Path, value: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Capability check, once per run. `Err` carries the reason the dependent
/// stages report in their `unavailable` results.
fn sentiment_analyzer(cfg: &PipelineConfig) -> std::result::Result<SentimentAnalyzer, String> {
    let lexicon = match &cfg.lexicon_path {
        Some(path) => Lexicon::from_file(path).map_err(|e| format!("{e:#}"))?,
        None => Lexicon::builtin(),
    };
    if lexicon.is_empty() {
        return Err("sentiment lexicon has no entries".to_string());
    }
    Ok(SentimentAnalyzer::new(lexicon))
}

/// Stage 1: ingest raw sources, clean, filter, deduplicate, persist.
pub fn run_clean(cfg: &PipelineConfig) -> Result<ReviewDataset> {
    let stage_start = std::time::Instant::now();
    info!("Cleaning stage started - raw_dir={}", cfg.raw_dir().display());

    let raw = load_raw_reviews(&cfg.raw_dir())?;
    let before = raw.len();
    if before == 0 {
        warn!("No raw reviews found - the cleaned dataset will be empty");
    }

    let cleaned = clean_reviews(raw, &cfg.clean);
    let removed = before - cleaned.len();
    info!(
        "Cleaning completed - kept={}, removed={}, duration={:.2}s",
        cleaned.len(),
        removed,
        stage_start.elapsed().as_secs_f32()
    );

    let dataset = ReviewDataset::new(&cfg.subject, now_stamp(), cleaned);
    for (source, count) in &dataset.sources {
        debug!("Clean dataset source counts - source={}, reviews={}", source, count);
    }

    std::fs::create_dir_all(cfg.clean_dir())
        .with_context(|| format!("creating {}", cfg.clean_dir().display()))?;
    write_json(&cfg.clean_file(), &dataset)?;
    info!("Clean dataset persisted - file={}", cfg.clean_file().display());

    Ok(dataset)
}

fn load_clean_dataset(cfg: &PipelineConfig) -> Result<ReviewDataset> {
    let path = cfg.clean_file();
    if !path.exists() {
        bail!(
            "No clean dataset at {} - run the cleaning stage first",
            path.display()
        );
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let dataset: ReviewDataset = serde_json::from_str(&raw)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(dataset)
}

/// Stage 2: score sentiment, aggregate, write insight JSONs and reports.
/// Requires the clean dataset on disk.
pub fn run_analysis(cfg: &PipelineConfig) -> Result<()> {
    let stage_start = std::time::Instant::now();
    let dataset = load_clean_dataset(cfg)?;
    info!(
        "Analysis stage started - reviews={}, sources={}",
        dataset.total_reviews,
        dataset.sources.len()
    );

    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;

    // basic insights never depend on the lexicon
    let basic = basic_insights(&dataset.reviews);
    write_json(&cfg.output_dir.join(BASIC_INSIGHTS_FILE), &basic)?;

    match sentiment_analyzer(cfg) {
        Err(reason) => {
            warn!("Sentiment capability unavailable - reason={}", reason);
            write_json(
                &cfg.output_dir.join(SENTIMENT_INSIGHTS_FILE),
                &Analysis::<SentimentInsights>::Unavailable { reason: reason.clone() },
            )?;
            write_json(
                &cfg.output_dir.join(THEMATIC_FILE),
                &Analysis::<ThematicReport>::Unavailable { reason: reason.clone() },
            )?;
            write_json(
                &cfg.output_dir.join(SOURCE_REPORT_FILE),
                &Analysis::<SourceReport>::Unavailable { reason: reason.clone() },
            )?;
            info!(
                "Analysis completed without sentiment - duration={:.2}s",
                stage_start.elapsed().as_secs_f32()
            );
            return Ok(());
        }
        Ok(analyzer) => {
            let scoring_start = std::time::Instant::now();
            let scored = score_reviews(&analyzer, &dataset.reviews);
            info!(
                "Scoring completed - reviews={}, duration={:.2}s",
                scored.len(),
                scoring_start.elapsed().as_secs_f32()
            );

            let scored_dataset = ReviewDataset::new(&cfg.subject, now_stamp(), scored);
            write_json(&cfg.output_dir.join(SCORED_REVIEWS_FILE), &scored_dataset)?;

            let insights = sentiment_insights(&scored_dataset.reviews);
            info!(
                "Sentiment insights - positive={}, neutral={}, negative={}, avg_compound={}",
                insights.by_label.positive,
                insights.by_label.neutral,
                insights.by_label.negative,
                insights.avg_compound
            );
            write_json(
                &cfg.output_dir.join(SENTIMENT_INSIGHTS_FILE),
                &Analysis::Ready(insights),
            )?;

            let thematic = build_thematic_report(&scored_dataset.reviews);
            write_json(&cfg.output_dir.join(THEMATIC_FILE), &Analysis::Ready(thematic.clone()))?;

            let sources = source_report(&scored_dataset.reviews);
            write_json(&cfg.output_dir.join(SOURCE_REPORT_FILE), &Analysis::Ready(sources.clone()))?;

            std::fs::write(
                cfg.output_dir.join(SOURCE_REPORT_MD),
                render_source_report(&sources),
            )
            .with_context(|| "writing source report markdown")?;
            std::fs::write(
                cfg.output_dir.join(THEMATIC_MD),
                render_thematic_report(&thematic),
            )
            .with_context(|| "writing thematic report markdown")?;
        }
    }

    info!(
        "Analysis completed - duration={:.2}s, output_dir={}",
        stage_start.elapsed().as_secs_f32(),
        cfg.output_dir.display()
    );
    Ok(())
}

/// Both stages back to back.
pub fn run_all(cfg: &PipelineConfig) -> Result<()> {
    run_clean(cfg)?;
    run_analysis(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: root.join("data"),
            output_dir: root.join("output"),
            subject: "F1 (2025)".into(),
            clean: CleanOptions::default(),
            lexicon_path: None,
        }
    }

    fn seed_raw(cfg: &PipelineConfig) {
        std::fs::create_dir_all(cfg.raw_dir()).unwrap();
        std::fs::write(
            cfg.raw_dir().join("reviews_youtube.json"),
            json!([{ "content": "This movie is insane, loved it!!", "likes": 50 }]).to_string(),
        )
        .unwrap();
        std::fs::write(
            cfg.raw_dir().join("reviews_reddit.json"),
            json!([{ "data": { "body": "honestly pretty bad and boring stuff", "score": 0 } }])
                .to_string(),
        )
        .unwrap();
    }

    #[test]
    fn end_to_end_clean_then_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        seed_raw(&cfg);

        let dataset = run_clean(&cfg).unwrap();
        assert_eq!(dataset.total_reviews, 2);
        assert_eq!(dataset.sources["YouTube"], 1);
        assert_eq!(dataset.sources["Reddit"], 1);

        run_analysis(&cfg).unwrap();

        let insights: Value = serde_json::from_str(
            &std::fs::read_to_string(cfg.output_dir.join(SENTIMENT_INSIGHTS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(insights["status"], "ready");
        assert_eq!(insights["by_label"]["positive"], 1);
        assert_eq!(insights["by_source"]["YouTube"]["count"], 1);
        assert_eq!(insights["by_source"]["Reddit"]["count"], 1);
        // the hype overlay pushes the YouTube comment positive
        assert!(insights["by_source"]["YouTube"]["avg_compound"].as_f64().unwrap() > 0.05);

        let scored: Value = serde_json::from_str(
            &std::fs::read_to_string(cfg.output_dir.join(SCORED_REVIEWS_FILE)).unwrap(),
        )
        .unwrap();
        let youtube = scored["reviews"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["source"] == "YouTube")
            .unwrap();
        assert_eq!(youtube["sentiment"]["label"], "positive");

        assert!(cfg.output_dir.join(SOURCE_REPORT_MD).exists());
        assert!(cfg.output_dir.join(THEMATIC_MD).exists());
    }

    #[test]
    fn analysis_without_clean_dataset_fails_with_guidance() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let err = run_analysis(&cfg).unwrap_err();
        assert!(err.to_string().contains("run the cleaning stage first"));
    }

    #[test]
    fn missing_lexicon_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.lexicon_path = Some(dir.path().join("nope.txt"));
        seed_raw(&cfg);

        run_clean(&cfg).unwrap();
        run_analysis(&cfg).unwrap();

        // basic insights still produced
        assert!(cfg.output_dir.join(BASIC_INSIGHTS_FILE).exists());
        let insights: Value = serde_json::from_str(
            &std::fs::read_to_string(cfg.output_dir.join(SENTIMENT_INSIGHTS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(insights["status"], "unavailable");
        assert!(insights["reason"].as_str().unwrap().contains("lexicon"));
    }

    #[test]
    fn clean_stage_tolerates_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        std::fs::create_dir_all(cfg.raw_dir()).unwrap();
        let dataset = run_clean(&cfg).unwrap();
        assert_eq!(dataset.total_reviews, 0);
        assert!(cfg.clean_file().exists());
    }
}
