//! Extraction entry points.
//!
//! One subcommand per dataset:
//! - `extract usmle [--limit N]` - MedQA USMLE question bank → OBGYN questions
//! - `extract vignettes` - Kenya clinical vignettes → OBGYN/MCH/SRH vignettes
//!
//! Both are resumable: classification outcomes land in a progress file as
//! they arrive, and re-invoking the command picks up where the last run
//! stopped (or goes straight to the export when everything is covered).

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classification::datasets::{usmle, vignettes};
use classification::{
    Gemini, Pipeline, PipelineConfig, ProgressEvent, ProgressSink, RetryPolicy, RunSummary,
};

const USMLE_SOURCE: &str = "data_clean/questions/US/US_qbank.jsonl";
const USMLE_PROGRESS: &str = "classifications.jsonl";
const USMLE_OUTPUT: &str = "data/obgyn_usmle.tsv";

const VIGNETTE_SOURCE: &str = "datasets/prompt_responses.json";
const VIGNETTE_PROGRESS: &str = "vignette_classifications.jsonl";
const VIGNETTE_OUTPUT: &str = "data/obgyn_vignettes.tsv";

#[derive(Parser)]
#[command(
    name = "extract",
    about = "Extract OBGYN-related items from medical QA datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the MedQA USMLE question bank and export OBGYN questions
    Usmle {
        /// Only classify the first N questions (test mode)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Classify the Kenya clinical vignettes and export OBGYN/MCH/SRH items
    Vignettes,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Commands::Usmle { limit } => run_usmle(limit).await,
        Commands::Vignettes => run_vignettes().await,
    }
}

async fn run_usmle(limit: Option<usize>) -> Result<()> {
    let config = PipelineConfig::new(USMLE_SOURCE, USMLE_PROGRESS, USMLE_OUTPUT)
        .with_batch_size(100)
        .with_retry(RetryPolicy::new(5, Duration::from_secs(30)));

    let mut questions = usmle::load(config.source_path())
        .with_context(|| format!("loading the USMLE question bank from {USMLE_SOURCE}"))?;
    if let Some(limit) = limit {
        questions.truncate(limit);
        println!("Limited to {} questions (test mode)", questions.len());
    } else {
        println!("Loaded {} questions", questions.len());
    }

    let gemini = Gemini::from_env().context("set the GEMINI_API_KEY environment variable")?;
    let summary = Pipeline::new(questions, gemini, config.clone())
        .with_progress(BatchBar::new())
        .run()
        .await?;

    print_summary("USMLE questions", &summary, &config);
    Ok(())
}

async fn run_vignettes() -> Result<()> {
    let config = PipelineConfig::new(VIGNETTE_SOURCE, VIGNETTE_PROGRESS, VIGNETTE_OUTPUT)
        .with_batch_size(10)
        .with_batch_interval(Duration::from_secs(1))
        .with_retry(RetryPolicy::new(3, Duration::from_secs(2)));

    let items = vignettes::load(config.source_path())
        .with_context(|| format!("loading the vignette set from {VIGNETTE_SOURCE}"))?;
    println!("Loaded {} vignettes", items.len());

    let gemini = Gemini::from_env().context("set the GEMINI_API_KEY environment variable")?;
    let summary = Pipeline::new(items, gemini, config.clone())
        .with_progress(BatchBar::new())
        .run()
        .await?;

    print_summary("vignettes", &summary, &config);
    Ok(())
}

fn print_summary(what: &str, summary: &RunSummary, config: &PipelineConfig) {
    println!();
    println!("{}", style("=".repeat(60)).dim());
    println!("{}", style("EXTRACTION COMPLETE").bold());
    println!("{}", style("=".repeat(60)).dim());
    println!("Source: {} {}", summary.total, what);
    println!(
        "Extracted: {} ({} newly classified in {} batches)",
        style(summary.export.exported).bold().cyan(),
        summary.newly_classified,
        summary.batches
    );
    println!("Output: {}", config.output_path.display());

    println!();
    println!("Classification breakdown ({} total):", summary.total);
    let mut counts: Vec<_> = summary.export.category_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1));
    for (category, count) in counts {
        println!("  {category}: {count}");
    }

    if !summary.export.failed_idxs.is_empty() {
        println!();
        println!(
            "  {} {} item(s) ended in failure categories - review these indices: {:?}",
            style("!").yellow(),
            summary.export.failed_idxs.len(),
            summary.export.failed_idxs
        );
    }
}

/// Terminal progress bar over the batch loop.
struct BatchBar {
    bar: Mutex<Option<ProgressBar>>,
}

impl BatchBar {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl ProgressSink for BatchBar {
    fn on_event(&self, event: ProgressEvent) {
        let mut bar = self.bar.lock().unwrap();
        match event {
            ProgressEvent::Started {
                already_classified,
                batches,
                ..
            } => {
                if already_classified > 0 {
                    println!("Already classified: {already_classified} (resuming)");
                }
                if batches > 0 {
                    let pb = ProgressBar::new(batches as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} batches {msg}")
                            .unwrap()
                            .progress_chars("█▓░"),
                    );
                    *bar = Some(pb);
                }
            }
            ProgressEvent::BatchClassified {
                classified,
                positive,
                failed,
                ..
            } => {
                if let Some(pb) = bar.as_ref() {
                    pb.inc(1);
                    let mut message = format!("{classified} classified, {positive} positive");
                    if failed > 0 {
                        message.push_str(&format!(", {failed} failed"));
                    }
                    pb.set_message(message);
                }
            }
            ProgressEvent::Finished { .. } => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}
