//! Sentiment labels, polarity scores, and the compound-score thresholds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compound scores at or above this value are labelled [`Sentiment::Positive`].
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound scores at or below this value are labelled [`Sentiment::Negative`].
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Categorical sentiment derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All labels, in report order.
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Classify a compound score.
    ///
    /// Both thresholds are inclusive: `0.05` is positive and `-0.05` is negative.
    /// Anything strictly between them (or NaN) is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sentiment label {0:?} (expected Positive, Negative or Neutral)")]
pub struct ParseSentimentError(pub String);

impl FromStr for Sentiment {
    type Err = ParseSentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Negative" => Ok(Self::Negative),
            "Neutral" => Ok(Self::Neutral),
            other => Err(ParseSentimentError(other.to_string())),
        }
    }
}

/// Output of a polarity scorer for one piece of text.
///
/// `negative`, `neutral` and `positive` are fractions of the text that sum to 1.0;
/// `compound` is the normalised overall polarity in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

impl PolarityScores {
    /// Scores for text with no sentiment-bearing content.
    pub const NEUTRAL: PolarityScores = PolarityScores {
        negative: 0.0,
        neutral: 1.0,
        positive: 0.0,
        compound: 0.0,
    };

    /// Sum of the three component fractions (1.0 for well-formed scores).
    pub fn component_sum(&self) -> f64 {
        self.negative + self.neutral + self.positive
    }

    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_compound(self.compound)
    }
}

/// Per-label record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `sentiment` in percent, or 0 when nothing was counted.
    pub fn percentage(&self, sentiment: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(sentiment) as f64 / total as f64 * 100.0
        }
    }
}

impl FromIterator<Sentiment> for LabelCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = Self::default();
        for sentiment in iter {
            counts.record(sentiment);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_threshold_is_inclusive() {
        assert_eq!(Sentiment::from_compound(0.05), Sentiment::Positive);
        assert_eq!(Sentiment::from_compound(0.0501), Sentiment::Positive);
        assert_eq!(Sentiment::from_compound(1.0), Sentiment::Positive);
    }

    #[test]
    fn negative_threshold_is_inclusive() {
        assert_eq!(Sentiment::from_compound(-0.05), Sentiment::Negative);
        assert_eq!(Sentiment::from_compound(-0.0501), Sentiment::Negative);
        assert_eq!(Sentiment::from_compound(-1.0), Sentiment::Negative);
    }

    #[test]
    fn between_thresholds_is_neutral() {
        assert_eq!(Sentiment::from_compound(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(0.0499), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(-0.0499), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn label_strings_roundtrip() {
        for sentiment in Sentiment::ALL {
            assert_eq!(sentiment.as_str().parse::<Sentiment>(), Ok(sentiment));
        }
        assert!("positive".parse::<Sentiment>().is_err());
    }

    #[test]
    fn label_serialises_as_capitalised_string() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"Negative\"");
    }

    #[test]
    fn neutral_scores_sum_to_one() {
        assert_eq!(PolarityScores::NEUTRAL.component_sum(), 1.0);
        assert_eq!(PolarityScores::NEUTRAL.sentiment(), Sentiment::Neutral);
    }

    #[test]
    fn label_counts_collect() {
        let counts: LabelCounts = [
            Sentiment::Positive,
            Sentiment::Positive,
            Sentiment::Neutral,
            Sentiment::Negative,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.positive, 2);
        assert_eq!(counts.negative, 1);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.total(), 4);
        assert!((counts.percentage(Sentiment::Positive) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_counts_have_zero_percentages() {
        let counts = LabelCounts::default();
        assert_eq!(counts.percentage(Sentiment::Neutral), 0.0);
    }
}
