//! In-memory annotation pass over a dataset.
//!
//! Walks records in order, scores every record that has no
//! `sentiment_analysis` yet, and leaves everything else alone. Records whose
//! headline cannot be scored are reported, never dropped.

use std::fmt;

use sentiline_core::{HeadlineIssue, HeadlineRecord, SentimentAnalysis};
use tracing::{debug, info, warn};

use crate::vader::PolarityScorer;

/// What the pass did with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Scored in this pass.
    Scored,
    /// Carried a stored analysis; left untouched.
    AlreadyScored,
    /// Headline unusable; left unscored.
    Unscorable(HeadlineIssue),
}

/// A record skipped because its headline cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnscorableRecord {
    /// Zero-based index into the dataset.
    pub index: usize,
    pub reason: HeadlineIssue,
}

impl UnscorableRecord {
    /// One-based position, as shown to users.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for UnscorableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: {}", self.position(), self.reason)
    }
}

/// Result of one annotation pass.
#[derive(Debug, Default)]
pub struct AnnotationOutcome {
    /// One entry per record, in dataset order.
    pub statuses: Vec<RecordStatus>,
    pub newly_scored: usize,
    pub already_scored: usize,
    pub warnings: Vec<UnscorableRecord>,
}

impl AnnotationOutcome {
    /// Whether any record was modified.
    pub fn changed(&self) -> bool {
        self.newly_scored > 0
    }
}

/// Attaches sentiment analyses using a [`PolarityScorer`].
pub struct Annotator<S> {
    scorer: S,
}

impl<S: PolarityScorer> Annotator<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score every unscored record in place.
    ///
    /// Stored analyses are never recomputed. Record order and every other
    /// field are untouched.
    pub fn annotate(&self, records: &mut [HeadlineRecord]) -> AnnotationOutcome {
        let mut outcome = AnnotationOutcome {
            statuses: Vec::with_capacity(records.len()),
            ..Default::default()
        };

        for (index, record) in records.iter_mut().enumerate() {
            if record.is_scored() {
                outcome.already_scored += 1;
                outcome.statuses.push(RecordStatus::AlreadyScored);
                continue;
            }

            let headline = match record.headline() {
                Ok(h) => h,
                Err(reason) => {
                    let skipped = UnscorableRecord { index, reason };
                    warn!(item = skipped.position(), %reason, "skipping unscorable record");
                    outcome.warnings.push(skipped);
                    outcome.statuses.push(RecordStatus::Unscorable(reason));
                    continue;
                }
            };

            let analysis = SentimentAnalysis::from_scores(self.scorer.polarity_scores(headline));
            debug!(
                item = index + 1,
                headline,
                sentiment = %analysis.sentiment,
                compound = analysis.compound,
                "scored"
            );
            record.attach_analysis(analysis);
            outcome.newly_scored += 1;
            outcome.statuses.push(RecordStatus::Scored);
        }

        info!(
            records = records.len(),
            newly_scored = outcome.newly_scored,
            already_scored = outcome.already_scored,
            unscorable = outcome.warnings.len(),
            "annotation pass complete"
        );
        outcome
    }
}

/// Indices of records that could be scored but are not yet.
///
/// Empty after a successful [`Annotator::annotate`].
pub fn pending_records(records: &[HeadlineRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_scored() && r.headline().is_ok())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VaderScorer;
    use sentiline_core::{PolarityScores, Sentiment};
    use serde_json::json;

    /// Returns the same compound for every text.
    struct FixedScorer(f64);

    impl PolarityScorer for FixedScorer {
        fn polarity_scores(&self, _text: &str) -> PolarityScores {
            PolarityScores {
                negative: 0.0,
                neutral: 1.0,
                positive: 0.0,
                compound: self.0,
            }
        }
    }

    fn records(value: serde_json::Value) -> Vec<HeadlineRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn label(record: &HeadlineRecord) -> Sentiment {
        record.sentiment_analysis().unwrap().unwrap().sentiment
    }

    #[test]
    fn scores_seeded_records() {
        let mut data = vec![
            HeadlineRecord::new("Great product"),
            HeadlineRecord::new("Terrible service"),
        ];
        let outcome = Annotator::new(VaderScorer::default()).annotate(&mut data);

        assert_eq!(outcome.newly_scored, 2);
        assert!(outcome.warnings.is_empty());
        assert_eq!(label(&data[0]), Sentiment::Positive);
        assert_eq!(label(&data[1]), Sentiment::Negative);
        for record in &data {
            let a = record.sentiment_analysis().unwrap().unwrap();
            assert!((a.scores().component_sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn second_pass_changes_nothing() {
        let annotator = Annotator::new(VaderScorer::default());
        let mut data = vec![HeadlineRecord::new("Great product")];
        annotator.annotate(&mut data);
        let before = serde_json::to_string(&data).unwrap();

        let outcome = annotator.annotate(&mut data);

        assert!(!outcome.changed());
        assert_eq!(outcome.already_scored, 1);
        assert_eq!(serde_json::to_string(&data).unwrap(), before);
    }

    #[test]
    fn stored_analysis_is_never_recomputed() {
        // Stored values disagree with what the scorer would produce.
        let stored = json!({
            "sentiment": "Negative",
            "negative": 1.0,
            "neutral": 0.0,
            "positive": 0.0,
            "compound": -0.9
        });
        let mut data = records(json!([
            {"headline": "Great product", "sentiment_analysis": stored.clone()}
        ]));

        Annotator::new(FixedScorer(0.8)).annotate(&mut data);

        assert_eq!(data[0].get("sentiment_analysis"), Some(&stored));
    }

    #[test]
    fn extra_fields_survive_in_place() {
        let mut data = records(json!([
            {"startup": "Acme", "headline": "Great product", "revenue": 1200, "language": "English"}
        ]));

        Annotator::new(VaderScorer::default()).annotate(&mut data);

        let keys: Vec<&str> = data[0].fields().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["startup", "headline", "revenue", "language", "sentiment_analysis"]
        );
        assert_eq!(data[0].get("startup"), Some(&json!("Acme")));
        assert_eq!(data[0].get("revenue"), Some(&json!(1200)));
    }

    #[test]
    fn interleaved_records_keep_order() {
        let mut data = records(json!([
            {"headline": "first"},
            {"headline": "second", "sentiment_analysis": {
                "sentiment": "Neutral", "negative": 0.0, "neutral": 1.0,
                "positive": 0.0, "compound": 0.0
            }},
            {"headline": "third"},
        ]));

        let outcome = Annotator::new(FixedScorer(0.0)).annotate(&mut data);

        assert_eq!(
            outcome.statuses,
            [
                RecordStatus::Scored,
                RecordStatus::AlreadyScored,
                RecordStatus::Scored
            ]
        );
        let headlines: Vec<&str> = data.iter().map(|r| r.headline().unwrap()).collect();
        assert_eq!(headlines, ["first", "second", "third"]);
    }

    #[test]
    fn threshold_boundaries() {
        for (compound, expected) in [
            (0.05, Sentiment::Positive),
            (-0.05, Sentiment::Negative),
            (0.0, Sentiment::Neutral),
            (0.0499, Sentiment::Neutral),
            (-0.0499, Sentiment::Neutral),
        ] {
            let mut data = vec![HeadlineRecord::new("anything")];
            Annotator::new(FixedScorer(compound)).annotate(&mut data);
            assert_eq!(label(&data[0]), expected, "compound {compound}");
        }
    }

    #[test]
    fn missing_headline_is_warned_and_kept() {
        let mut data = records(json!([
            {"other_field": 1},
            {"headline": "Great product"},
        ]));

        let outcome = Annotator::new(VaderScorer::default()).annotate(&mut data);

        assert_eq!(
            outcome.warnings,
            [UnscorableRecord {
                index: 0,
                reason: HeadlineIssue::Missing
            }]
        );
        assert_eq!(outcome.warnings[0].position(), 1);
        assert_eq!(data[0].fields().len(), 1);
        assert_eq!(data[0].get("other_field"), Some(&json!(1)));
        assert!(!data[0].is_scored());
        assert!(data[1].is_scored());
    }

    #[test]
    fn unscorable_headlines() {
        let mut data = records(json!([
            {"headline": "   "},
            {"headline": 42},
            {"headline": null},
        ]));

        let outcome = Annotator::new(FixedScorer(0.5)).annotate(&mut data);

        let reasons: Vec<HeadlineIssue> = outcome.warnings.iter().map(|w| w.reason).collect();
        assert_eq!(
            reasons,
            [
                HeadlineIssue::Blank,
                HeadlineIssue::NotText,
                HeadlineIssue::Missing
            ]
        );
        assert_eq!(outcome.newly_scored, 0);
        assert!(data.iter().all(|r| !r.is_scored()));
    }

    #[test]
    fn null_analysis_is_rescored() {
        let mut data = records(json!([{"headline": "x", "sentiment_analysis": null}]));
        let outcome = Annotator::new(FixedScorer(0.9)).annotate(&mut data);
        assert_eq!(outcome.newly_scored, 1);
        assert_eq!(label(&data[0]), Sentiment::Positive);
    }

    #[test]
    fn pending_excludes_scored_and_unscorable() {
        let mut data = records(json!([
            {"headline": "a"},
            {"other_field": 1},
            {"headline": "b"},
        ]));
        assert_eq!(pending_records(&data), [0, 2]);

        Annotator::new(FixedScorer(0.0)).annotate(&mut data);
        assert!(pending_records(&data).is_empty());
    }

    #[test]
    fn warning_display() {
        let w = UnscorableRecord {
            index: 2,
            reason: HeadlineIssue::Missing,
        };
        assert_eq!(w.to_string(), "item 3: no headline");
    }
}
