//! Dataset-level statistics over annotated headlines.
//!
//! Computes the label distribution, mean component scores, a compound-score
//! histogram, and the most positive / most negative headlines.

use std::cmp::Ordering;

use serde_json::Value;

use crate::record::{HeadlineRecord, SentimentAnalysis};
use crate::sentiment::LabelCounts;

/// Number of equal-width compound histogram bins over `[-1, 1]`.
pub const HISTOGRAM_BINS: usize = 20;

const LANGUAGE_KEY: &str = "language";
const ENGLISH: &str = "English";

/// Filters and limits for [`DatasetSummary::from_records`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Keep only records whose `language` field is `"English"`.
    pub english_only: bool,
    /// How many headlines to list at each end of the compound range.
    pub top_n: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            english_only: false,
            top_n: 5,
        }
    }
}

/// A headline together with its stored analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHeadline {
    /// Zero-based position in the dataset.
    pub index: usize,
    pub headline: String,
    pub analysis: SentimentAnalysis,
}

/// Aggregate statistics for a dataset.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub total_records: usize,
    /// Records dropped because they have no usable headline.
    pub without_headline: usize,
    /// Records dropped because their analysis is absent or malformed.
    pub without_analysis: usize,
    /// Records dropped by the English-only filter.
    pub filtered_language: usize,
    pub counts: LabelCounts,
    pub mean_negative: f64,
    pub mean_neutral: f64,
    pub mean_positive: f64,
    pub mean_compound: f64,
    pub compound_histogram: [usize; HISTOGRAM_BINS],
    /// Highest compound first.
    pub most_positive: Vec<ScoredHeadline>,
    /// Lowest compound first.
    pub most_negative: Vec<ScoredHeadline>,
}

impl DatasetSummary {
    pub fn from_records(records: &[HeadlineRecord], options: &SummaryOptions) -> Self {
        let mut without_headline = 0;
        let mut without_analysis = 0;
        let mut filtered_language = 0;
        let mut scored: Vec<ScoredHeadline> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Ok(headline) = record.headline() else {
                without_headline += 1;
                continue;
            };
            let Some(Ok(analysis)) = record.sentiment_analysis() else {
                without_analysis += 1;
                continue;
            };
            if options.english_only && !is_english(record) {
                filtered_language += 1;
                continue;
            }
            scored.push(ScoredHeadline {
                index,
                headline: headline.to_string(),
                analysis,
            });
        }

        let counts: LabelCounts = scored.iter().map(|s| s.analysis.sentiment).collect();

        let mut compound_histogram = [0usize; HISTOGRAM_BINS];
        for s in &scored {
            compound_histogram[histogram_bin(s.analysis.compound)] += 1;
        }

        let mean = |f: fn(&SentimentAnalysis) -> f64| -> f64 {
            if scored.is_empty() {
                0.0
            } else {
                scored.iter().map(|s| f(&s.analysis)).sum::<f64>() / scored.len() as f64
            }
        };
        let mean_negative = mean(|a| a.negative);
        let mean_neutral = mean(|a| a.neutral);
        let mean_positive = mean(|a| a.positive);
        let mean_compound = mean(|a| a.compound);

        // Stable sorts: ties keep dataset order.
        let mut ascending = scored;
        ascending.sort_by(|a, b| cmp_compound(a, b));
        let most_negative: Vec<ScoredHeadline> =
            ascending.iter().take(options.top_n).cloned().collect();
        ascending.sort_by(|a, b| cmp_compound(b, a));
        let most_positive: Vec<ScoredHeadline> =
            ascending.into_iter().take(options.top_n).collect();

        Self {
            total_records: records.len(),
            without_headline,
            without_analysis,
            filtered_language,
            counts,
            mean_negative,
            mean_neutral,
            mean_positive,
            mean_compound,
            compound_histogram,
            most_positive,
            most_negative,
        }
    }

    /// Number of records that made it into the statistics.
    pub fn analysed(&self) -> usize {
        self.counts.total()
    }
}

/// Histogram bin for a compound score. Scores outside `[-1, 1]` are clamped;
/// `1.0` falls into the last bin.
pub fn histogram_bin(compound: f64) -> usize {
    let width = 2.0 / HISTOGRAM_BINS as f64;
    let bin = ((compound + 1.0) / width).floor();
    if bin.is_nan() || bin < 0.0 {
        0
    } else {
        (bin as usize).min(HISTOGRAM_BINS - 1)
    }
}

/// Lower and upper edge of a histogram bin.
pub fn bin_edges(bin: usize) -> (f64, f64) {
    let width = 2.0 / HISTOGRAM_BINS as f64;
    let lo = -1.0 + bin as f64 * width;
    (lo, lo + width)
}

fn is_english(record: &HeadlineRecord) -> bool {
    matches!(record.get(LANGUAGE_KEY), Some(Value::String(lang)) if lang == ENGLISH)
}

fn cmp_compound(a: &ScoredHeadline, b: &ScoredHeadline) -> Ordering {
    a.analysis
        .compound
        .partial_cmp(&b.analysis.compound)
        .unwrap_or(Ordering::Equal)
}
