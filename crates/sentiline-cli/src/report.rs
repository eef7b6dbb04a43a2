//! Console rendering for annotation runs, dataset summaries and ad-hoc scores.
//!
//! Every function writes to an `impl Write` so the binary can hand it a
//! locked stdout and tests can hand it a buffer.

use std::io::{self, Write};

use sentiline_ai::{AnnotationOutcome, RecordStatus};
use sentiline_core::summary::{HISTOGRAM_BINS, bin_edges};
use sentiline_core::{
    AnalysisProblem, DatasetSummary, HeadlineRecord, LabelCounts, PolarityScores, ScoredHeadline,
    Sentiment,
};

const RULE: &str = "----------------------------------------";
const HISTOGRAM_WIDTH: usize = 40;

// ── Annotation ──

/// One block per scored record, plus a warning line per skipped record.
pub fn write_annotation(
    out: &mut impl Write,
    records: &[HeadlineRecord],
    outcome: &AnnotationOutcome,
) -> io::Result<()> {
    for (index, (record, status)) in records.iter().zip(&outcome.statuses).enumerate() {
        match status {
            RecordStatus::Unscorable(reason) => {
                writeln!(out, "Warning: item {}: {reason}. Skipping...", index + 1)?;
                writeln!(out, "{RULE}")?;
            }
            RecordStatus::Scored | RecordStatus::AlreadyScored => {
                let Some(Ok(analysis)) = record.sentiment_analysis() else {
                    continue;
                };
                let origin = if *status == RecordStatus::Scored {
                    "new"
                } else {
                    "kept"
                };
                writeln!(
                    out,
                    "Item {}: {}",
                    index + 1,
                    record.headline().unwrap_or_default()
                )?;
                writeln!(out, "Sentiment: {} ({origin})", analysis.sentiment)?;
                writeln!(out, "Scores: {}", format_scores(&analysis.scores()))?;
                writeln!(out, "{RULE}")?;
            }
        }
    }
    Ok(())
}

/// Run totals: newly scored, kept, skipped.
pub fn write_outcome_totals(out: &mut impl Write, outcome: &AnnotationOutcome) -> io::Result<()> {
    writeln!(
        out,
        "Scored {} new, kept {} existing, skipped {} unscorable",
        outcome.newly_scored,
        outcome.already_scored,
        outcome.warnings.len()
    )
}

/// Label counts with percentages, in a fixed Positive/Negative/Neutral order.
pub fn write_label_counts(out: &mut impl Write, counts: &LabelCounts) -> io::Result<()> {
    writeln!(out, "Sentiment counts ({} records):", counts.total())?;
    for sentiment in Sentiment::ALL {
        writeln!(
            out,
            "  {:<10} {:>5}  ({:>5.1}%)",
            sentiment.as_str(),
            counts.get(sentiment),
            counts.percentage(sentiment)
        )?;
    }
    Ok(())
}

// ── Summary ──

pub fn write_summary(out: &mut impl Write, summary: &DatasetSummary) -> io::Result<()> {
    writeln!(out, "=== Dataset summary ===")?;
    writeln!(out, "  {:<22} {}", "records", summary.total_records)?;
    writeln!(out, "  {:<22} {}", "analysed", summary.analysed())?;
    writeln!(out, "  {:<22} {}", "without headline", summary.without_headline)?;
    writeln!(out, "  {:<22} {}", "without analysis", summary.without_analysis)?;
    if summary.filtered_language > 0 {
        writeln!(out, "  {:<22} {}", "non-English (skipped)", summary.filtered_language)?;
    }
    writeln!(out)?;

    write_label_counts(out, &summary.counts)?;
    writeln!(out)?;

    writeln!(out, "Mean scores:")?;
    writeln!(out, "  {:<10} {:.3}", "negative", summary.mean_negative)?;
    writeln!(out, "  {:<10} {:.3}", "neutral", summary.mean_neutral)?;
    writeln!(out, "  {:<10} {:.3}", "positive", summary.mean_positive)?;
    writeln!(out, "  {:<10} {:.4}", "compound", summary.mean_compound)?;
    writeln!(out)?;

    writeln!(out, "Compound score distribution:")?;
    write_histogram(out, &summary.compound_histogram)?;
    writeln!(out)?;

    writeln!(out, "Most positive:")?;
    write_ranked(out, &summary.most_positive)?;
    writeln!(out)?;
    writeln!(out, "Most negative:")?;
    write_ranked(out, &summary.most_negative)
}

fn write_histogram(out: &mut impl Write, bins: &[usize; HISTOGRAM_BINS]) -> io::Result<()> {
    let max = bins.iter().copied().max().unwrap_or(0);
    for (bin, &count) in bins.iter().enumerate() {
        let (lo, hi) = bin_edges(bin);
        // Scale bars to the fullest bin; any non-empty bin gets at least one mark.
        let width = if max == 0 {
            0
        } else {
            (count * HISTOGRAM_WIDTH).div_ceil(max)
        };
        writeln!(
            out,
            "  [{lo:>5.2}, {hi:>5.2}{} {count:>5} {}",
            if bin == HISTOGRAM_BINS - 1 { ']' } else { ')' },
            "#".repeat(width)
        )?;
    }
    Ok(())
}

fn write_ranked(out: &mut impl Write, ranked: &[ScoredHeadline]) -> io::Result<()> {
    if ranked.is_empty() {
        return writeln!(out, "  (none)");
    }
    for (rank, s) in ranked.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:>7.4}  {}",
            rank + 1,
            s.analysis.compound,
            s.headline
        )?;
    }
    Ok(())
}

// ── Check ──

pub fn write_check(
    out: &mut impl Write,
    total: usize,
    problems: &[AnalysisProblem],
) -> io::Result<()> {
    if problems.is_empty() {
        return writeln!(out, "OK: all {total} records with a headline carry a sentiment analysis");
    }
    for p in problems {
        writeln!(out, "  {p}")?;
    }
    writeln!(
        out,
        "FAILED: {} of {total} records lack a complete sentiment analysis",
        problems.len()
    )
}

// ── Score ──

pub fn write_score(out: &mut impl Write, text: &str, scores: &PolarityScores) -> io::Result<()> {
    writeln!(out, "{text}")?;
    writeln!(out, "Sentiment: {}", scores.sentiment())?;
    writeln!(out, "Scores: {}", format_scores(scores))
}

fn format_scores(s: &PolarityScores) -> String {
    format!(
        "neg {:.3}  neu {:.3}  pos {:.3}  compound {:.4}",
        s.negative, s.neutral, s.positive, s.compound
    )
}
