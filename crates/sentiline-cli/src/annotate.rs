//! Annotation pipeline: load or bootstrap the dataset, score, persist once.

use std::time::Instant;

use anyhow::{Context, bail};
use sentiline_ai::{AnnotationOutcome, Annotator, PolarityScorer, pending_records};
use sentiline_core::HeadlineRecord;
use sentiline_store::{DatasetSource, DatasetStore, LoadedDataset};

#[derive(Debug)]
pub struct AnnotateRun {
    /// The dataset after annotation, in file order.
    pub records: Vec<HeadlineRecord>,
    pub source: DatasetSource,
    pub outcome: AnnotationOutcome,
    /// Whether the dataset file was (re)written.
    pub written: bool,
    pub elapsed_secs: f64,
}

/// Run the full pipeline: load (or seed) → annotate → write.
///
/// The dataset is written at most once, after every record has been
/// processed. Nothing is written when the run fails, when `dry_run` is set,
/// or when an existing dataset needed no new scores.
pub fn run_annotate<S: PolarityScorer>(
    store: &DatasetStore,
    annotator: &Annotator<S>,
    dry_run: bool,
) -> anyhow::Result<AnnotateRun> {
    let start = Instant::now();

    // 1. Load the dataset or build it from the seed.
    let LoadedDataset {
        mut records,
        source,
    } = store
        .load_or_bootstrap()
        .with_context(|| format!("loading {}", store.dataset_path().display()))?;

    // 2. Score everything that is not scored yet.
    let outcome = annotator.annotate(&mut records);

    let pending = pending_records(&records);
    if !pending.is_empty() {
        bail!(
            "{} scorable records left unscored after annotation",
            pending.len()
        );
    }

    // 3. Persist once.
    let needs_write = outcome.changed() || source == DatasetSource::Seeded;
    let written = !dry_run && needs_write;
    if written {
        store
            .persist(&records)
            .with_context(|| format!("writing {}", store.dataset_path().display()))?;
    }

    Ok(AnnotateRun {
        records,
        source,
        outcome,
        written,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
