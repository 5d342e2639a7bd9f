// src/render.rs
use crate::insights::{SourceMetrics, SourceReport};
use crate::models::SentimentLabel;
use crate::sentiment::{NEG_THRESHOLD, POS_THRESHOLD};
use crate::thematic::{LabelThemes, ThematicReport};

pub fn render_source_report(report: &SourceReport) -> String {
    let mut md = String::new();
    md.push_str("# Sentiment by source\n\n");

    md.push_str("## Summary\n");
    md.push_str(&format!("- Total reviews analyzed: **{}**\n", report.total_reviews));
    md.push_str(&format!("- Sources: {}\n", report.sources.join(", ")));
    md.push_str(
        "- Comparisons use normalized metrics (%, per review, per 100 reviews) so volume \
         differences between sources do not skew them.\n\n",
    );

    md.push_str("## Per-source metrics\n\n");
    for (name, m) in &report.by_source {
        md.push_str(&format!("### {}\n", name));
        md.push_str(&format!("- Reviews: **{}**\n", m.count));
        md.push_str(&format!("- Mean compound: **{}**\n", m.avg_compound));
        md.push_str(&format!("- Dominant label: **{}**\n", m.dominant_label));
        md.push_str(&format!(
            "- Distribution: positive {}%, neutral {}%, negative {}%\n",
            m.pct_positive, m.pct_neutral, m.pct_negative
        ));
        md.push_str(&format!(
            "- Engagement: total **{}**, per review **{}**\n\n",
            m.engagement_total, m.engagement_per_review
        ));

        if !m.top_words.is_empty() {
            md.push_str("Top words (per 100 reviews):\n\n");
            for w in m.top_words.iter().take(10) {
                md.push_str(&format!("- {} ({})\n", w.term, w.per_100_reviews));
            }
            md.push('\n');
        }
    }

    md.push_str("## Recommendations\n\n");
    for (name, m) in &report.by_source {
        md.push_str(&format!("- {}\n", recommendation_for(name, m)));
    }
    md.push('\n');

    md
}

fn recommendation_for(name: &str, m: &SourceMetrics) -> String {
    if m.dominant_label == SentimentLabel::Positive || m.avg_compound >= POS_THRESHOLD {
        format!(
            "**{}**: sentiment is mostly positive. Amplify the aspects the audience already \
             praises (see top words) and reuse real quotes in campaigns.",
            name
        )
    } else if m.dominant_label == SentimentLabel::Negative || m.avg_compound <= NEG_THRESHOLD {
        format!(
            "**{}**: negative weight is significant. Address the recurring objections (see \
             negative samples) and avoid echoing terms that appear in negative context.",
            name
        )
    } else {
        format!(
            "**{}**: sentiment is neutral. Room to inform and differentiate; borrow the \
             audience's own vocabulary (top words) for copy.",
            name
        )
    }
}

pub fn render_thematic_report(report: &ThematicReport) -> String {
    let mut md = String::new();
    md.push_str("# Thematic analysis\n\n");

    md.push_str("## Summary\n");
    md.push_str(&format!("- Total analyzed: {}\n", report.summary.total_analyzed));
    md.push_str(&format!(
        "- Positive: {} ({}%)\n",
        report.summary.positive, report.summary.pct_positive
    ));
    md.push_str(&format!("- Neutral: {}\n", report.summary.neutral));
    md.push_str(&format!("- Negative: {}\n\n", report.summary.negative));

    if !report.overall.top_words.is_empty() {
        md.push_str("## Most discussed overall\n\n");
        for w in report.overall.top_words.iter().take(15) {
            md.push_str(&format!("- **{}** ({})\n", w.term, w.count));
        }
        md.push('\n');
    }

    render_label_block(&mut md, "Why it reads POSITIVE", &report.why_positive, "negative");
    render_label_block(&mut md, "Why it reads NEGATIVE", &report.why_negative, "positive");
    render_label_block(&mut md, "Neutral commentary", &report.why_neutral, "");

    if !report.by_source.is_empty() {
        md.push_str("## By source\n\n");
        for (name, s) in &report.by_source {
            md.push_str(&format!("### {}\n", name));
            md.push_str(&format!(
                "- Total: {} | Pos: {} | Neu: {} | Neg: {}\n",
                s.count, s.positive, s.neutral, s.negative
            ));
            let words: Vec<&str> = s.top_words.iter().take(8).map(|t| t.term.as_str()).collect();
            if !words.is_empty() {
                md.push_str(&format!("- Top words: {}\n", words.join(", ")));
            }
            md.push('\n');
        }
    }

    md
}

fn render_label_block(md: &mut String, title: &str, themes: &LabelThemes, opposite: &str) {
    md.push_str(&format!("## {}\n\n", title));

    if !themes.top_words.is_empty() {
        md.push_str("### Most repeated words\n\n");
        for w in themes.top_words.iter().take(15) {
            md.push_str(&format!("- **{}** ({})\n", w.term, w.count));
        }
        md.push('\n');
    }

    if !themes.top_bigrams.is_empty() {
        md.push_str("### Recurring bigrams\n\n");
        for b in themes.top_bigrams.iter().take(10) {
            md.push_str(&format!("- {} ({})\n", b.term, b.count));
        }
        md.push('\n');
    }

    if !themes.distinctive_terms.is_empty() {
        md.push_str(&format!("### Distinctive terms vs {}\n\n", opposite));
        md.push_str(&format!("{}\n\n", themes.distinctive_terms.join(", ")));
    }

    if !themes.quotes.is_empty() {
        md.push_str("### Representative quotes\n\n");
        for q in &themes.quotes {
            md.push_str(&format!(
                "> \"{}\" ({}, {} likes)\n\n",
                q.content, q.source, q.engagement
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::source_report;
    use crate::models::{Review, SentimentScore, Source};
    use crate::sentiment::label_for;
    use crate::thematic::build_thematic_report;

    fn scored(source: Source, content: &str, engagement: u64, compound: f64) -> Review {
        Review {
            source,
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
                label: label_for(compound),
            }),
            extra: Default::default(),
        }
    }

    #[test]
    fn source_report_renders_sections_and_recommendations() {
        let reviews = vec![
            scored(Source::YouTube, "goosebumps from the insane trailer edit", 40, 0.8),
            scored(Source::Reddit, "boring and predictable promotion honestly", 2, -0.6),
        ];
        let md = render_source_report(&source_report(&reviews));
        assert!(md.contains("# Sentiment by source"));
        assert!(md.contains("### YouTube"));
        assert!(md.contains("### Reddit"));
        assert!(md.contains("mostly positive"));
        assert!(md.contains("negative weight"));
    }

    #[test]
    fn thematic_report_renders_label_blocks() {
        let reviews = vec![
            scored(Source::YouTube, "soundtrack absolutely magnificent goosebumps", 10, 0.9),
            scored(Source::Reddit, "script feels lazy and boring", 0, -0.5),
        ];
        let md = render_thematic_report(&build_thematic_report(&reviews));
        assert!(md.contains("Why it reads POSITIVE"));
        assert!(md.contains("Why it reads NEGATIVE"));
        assert!(md.contains("soundtrack"));
    }

    #[test]
    fn empty_report_still_renders() {
        let md = render_source_report(&source_report(&[]));
        assert!(md.contains("Total reviews analyzed: **0**"));
    }
}
