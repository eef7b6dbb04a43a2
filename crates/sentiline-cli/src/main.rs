//! Sentiline CLI
//!
//! Keeps a JSON dataset of marketing headlines annotated with sentiment.
//!
//! # Commands
//!
//! - `annotate`: load or seed the dataset, score unscored headlines, write once
//! - `summary`: label distribution, mean scores, histogram, top headlines
//! - `check`: fail unless every headline carries a complete analysis
//! - `score`: score ad-hoc text

mod annotate;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sentiline_ai::{Annotator, Lexicon, PolarityScorer, VaderScorer};
use sentiline_core::{DatasetSummary, SummaryOptions, find_analysis_problems, label_counts};
use sentiline_store::{DatasetSource, DatasetStore, read_dataset};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Headline sentiment annotator
#[derive(Parser)]
#[command(name = "sentiline", version, about, propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every unscored headline and save the dataset
    ///
    /// When the dataset does not exist yet it is created from the seed file,
    /// one headline per non-blank line.
    Annotate(AnnotateArgs),
    /// Print statistics for an annotated dataset
    Summary(SummaryArgs),
    /// Verify every headline carries a complete sentiment analysis
    Check(DatasetArg),
    /// Score text given on the command line
    Score(ScoreArgs),
}

#[derive(Args)]
struct DatasetArg {
    /// Dataset file (JSON array of records)
    #[arg(long, env = "SENTILINE_DATASET", default_value = "data.json")]
    dataset: PathBuf,
}

#[derive(Args)]
struct LexiconArg {
    /// VADER lexicon file (token<TAB>valence...); defaults to the built-in lexicon
    #[arg(long, env = "SENTILINE_LEXICON")]
    lexicon: Option<PathBuf>,
}

#[derive(Args)]
struct AnnotateArgs {
    #[command(flatten)]
    dataset: DatasetArg,

    /// Seed file used when the dataset does not exist
    #[arg(long, env = "SENTILINE_SEED", default_value = "initial_data.txt")]
    seed: PathBuf,

    #[command(flatten)]
    lexicon: LexiconArg,

    /// Score and report without writing the dataset
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    dataset: DatasetArg,

    /// Only include records whose `language` is "English"
    #[arg(long)]
    english_only: bool,

    /// Number of most positive and most negative headlines to list
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args)]
struct ScoreArgs {
    #[command(flatten)]
    lexicon: LexiconArg,

    /// Text to score; multiple arguments are joined with spaces
    #[arg(required = true)]
    text: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("sentiline v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Annotate(args) => cmd_annotate(args),
        Commands::Summary(args) => cmd_summary(args),
        Commands::Check(args) => cmd_check(args),
        Commands::Score(args) => cmd_score(args),
    }
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_scorer(lexicon: Option<&Path>) -> anyhow::Result<VaderScorer> {
    let lexicon = match lexicon {
        Some(path) => Lexicon::from_path(path)
            .with_context(|| format!("loading lexicon {}", path.display()))?,
        None => Lexicon::embedded(),
    };
    Ok(VaderScorer::new(lexicon))
}

// ── Commands ──

fn cmd_annotate(args: AnnotateArgs) -> anyhow::Result<()> {
    let scorer = load_scorer(args.lexicon.lexicon.as_deref())?;
    let annotator = Annotator::new(scorer);
    let store = DatasetStore::new(args.dataset.dataset, args.seed);

    let run = annotate::run_annotate(&store, &annotator, args.dry_run)?;

    let mut out = io::stdout().lock();
    if run.source == DatasetSource::Seeded {
        writeln!(
            out,
            "Seeded {} records from {}",
            run.records.len(),
            store.seed_path().display()
        )?;
    }
    report::write_annotation(&mut out, &run.records, &run.outcome)?;
    report::write_outcome_totals(&mut out, &run.outcome)?;
    report::write_label_counts(&mut out, &label_counts(&run.records))?;

    let path = store.dataset_path().display();
    if run.written {
        writeln!(out, "Results saved to {path}")?;
    } else if args.dry_run {
        writeln!(out, "Dry run: {path} not written")?;
    } else {
        writeln!(out, "Nothing new to score; {path} unchanged")?;
    }
    info!(elapsed_secs = run.elapsed_secs, "annotate finished");
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let path = &args.dataset.dataset;
    let records = read_dataset(path).with_context(|| format!("reading {}", path.display()))?;
    let options = SummaryOptions {
        english_only: args.english_only,
        top_n: args.top,
    };
    let summary = DatasetSummary::from_records(&records, &options);
    report::write_summary(&mut io::stdout().lock(), &summary)?;
    Ok(())
}

fn cmd_check(args: DatasetArg) -> anyhow::Result<()> {
    let path = &args.dataset;
    let records = read_dataset(path).with_context(|| format!("reading {}", path.display()))?;
    let problems = find_analysis_problems(&records);
    report::write_check(&mut io::stdout().lock(), records.len(), &problems)?;
    if !problems.is_empty() {
        bail!(
            "{} records in {} lack a complete sentiment analysis",
            problems.len(),
            path.display()
        );
    }
    Ok(())
}

fn cmd_score(args: ScoreArgs) -> anyhow::Result<()> {
    let scorer = load_scorer(args.lexicon.lexicon.as_deref())?;
    let text = args.text.join(" ");
    let scores = scorer.polarity_scores(&text);
    report::write_score(&mut io::stdout().lock(), &text, &scores)?;
    Ok(())
}
