mod clean;
mod ingest;
mod insights;
mod lexicon;
mod models;
mod normalize;
mod pipeline;
mod render;
mod sentiment;
mod stopwords;
mod thematic;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use clean::CleanOptions;
use pipeline::{run_all, run_analysis, run_clean, PipelineConfig};

/// filmbuzz - multi-source film commentary sentiment and theme analysis
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Root directory holding raw/ and clean/ stage files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for insight JSONs and markdown reports
    #[arg(short, long, default_value = "output/insights")]
    output_dir: PathBuf,

    /// Subject the commentary is about (stamped into datasets)
    #[arg(long, default_value = "F1 (2025)")]
    subject: String,

    /// Replacement base lexicon file (word<TAB>valence per line)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Minimum post-clean content length in characters
    #[arg(long, default_value_t = 15)]
    min_content_length: usize,

    /// Minimum number of significant words
    #[arg(long, default_value_t = 3)]
    min_words: usize,

    /// Keep duplicate reviews instead of collapsing them
    #[arg(long)]
    keep_duplicates: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest raw source files, clean, filter and deduplicate
    Clean,
    /// Score sentiment and write insight reports (requires a clean dataset)
    Analyze,
    /// Run cleaning and analysis back to back
    All,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    info!("Starting filmbuzz - subject={}", args.subject);

    let cfg = PipelineConfig {
        data_dir: args.data_dir,
        output_dir: args.output_dir,
        subject: args.subject,
        clean: CleanOptions {
            min_content_length: args.min_content_length,
            min_words: args.min_words,
            deduplicate: !args.keep_duplicates,
        },
        lexicon_path: args.lexicon,
    };

    match args.command {
        Command::Clean => {
            run_clean(&cfg)?;
        }
        Command::Analyze => {
            run_analysis(&cfg)?;
        }
        Command::All => {
            run_all(&cfg)?;
        }
    }

    Ok(())
}
