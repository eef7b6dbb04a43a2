//! Headline records as they live in the dataset file.
//!
//! A record is an arbitrary JSON object. Only two keys are interpreted:
//! `headline` (the text to score) and `sentiment_analysis` (the result).
//! Every other key is carried through untouched and in its original position.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::sentiment::{LabelCounts, PolarityScores, Sentiment};

pub const HEADLINE_KEY: &str = "headline";
pub const SENTIMENT_ANALYSIS_KEY: &str = "sentiment_analysis";

/// Stored sentiment result attached to a record.
///
/// Field order matches the on-disk layout: label first, then the components,
/// then the compound score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

impl SentimentAnalysis {
    /// Label the scores using the compound thresholds.
    pub fn from_scores(scores: PolarityScores) -> Self {
        Self {
            sentiment: scores.sentiment(),
            negative: scores.negative,
            neutral: scores.neutral,
            positive: scores.positive,
            compound: scores.compound,
        }
    }

    pub fn scores(&self) -> PolarityScores {
        PolarityScores {
            negative: self.negative,
            neutral: self.neutral,
            positive: self.positive,
            compound: self.compound,
        }
    }

    fn to_value(self) -> Value {
        json!({
            "sentiment": self.sentiment.as_str(),
            "negative": self.negative,
            "neutral": self.neutral,
            "positive": self.positive,
            "compound": self.compound,
        })
    }
}

/// Why a record's headline cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineIssue {
    /// No `headline` key (or it is `null`).
    Missing,
    /// `headline` holds a number, array, object or boolean.
    NotText,
    /// `headline` is empty or only whitespace.
    Blank,
}

impl fmt::Display for HeadlineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("no headline"),
            Self::NotText => f.write_str("headline is not text"),
            Self::Blank => f.write_str("headline is empty"),
        }
    }
}

/// One entry of the dataset array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadlineRecord {
    fields: Map<String, Value>,
}

impl HeadlineRecord {
    /// A fresh, unscored record holding only a headline.
    pub fn new(headline: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(HEADLINE_KEY.to_string(), Value::String(headline.into()));
        Self { fields }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Look up an arbitrary field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The headline text, exactly as stored.
    ///
    /// Fails when the key is absent, not a string, or blank after trimming.
    pub fn headline(&self) -> Result<&str, HeadlineIssue> {
        match self.fields.get(HEADLINE_KEY) {
            None | Some(Value::Null) => Err(HeadlineIssue::Missing),
            Some(Value::String(s)) if s.trim().is_empty() => Err(HeadlineIssue::Blank),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(HeadlineIssue::NotText),
        }
    }

    /// Whether a `sentiment_analysis` value is present. `null` counts as absent.
    pub fn is_scored(&self) -> bool {
        !matches!(
            self.fields.get(SENTIMENT_ANALYSIS_KEY),
            None | Some(Value::Null)
        )
    }

    /// Decode the stored analysis, if any.
    ///
    /// Returns `None` when unscored and `Some(Err(_))` when the stored value is
    /// missing fields or has the wrong shape.
    pub fn sentiment_analysis(&self) -> Option<Result<SentimentAnalysis, serde_json::Error>> {
        if !self.is_scored() {
            return None;
        }
        self.fields
            .get(SENTIMENT_ANALYSIS_KEY)
            .map(|v| SentimentAnalysis::deserialize(v))
    }

    /// Attach an analysis to an unscored record.
    ///
    /// Existing analyses are never replaced: returns `false` and leaves the
    /// record untouched when one is already present.
    pub fn attach_analysis(&mut self, analysis: SentimentAnalysis) -> bool {
        if self.is_scored() {
            return false;
        }
        self.fields
            .insert(SENTIMENT_ANALYSIS_KEY.to_string(), analysis.to_value());
        true
    }
}

/// Count labels across every record whose stored analysis decodes cleanly.
pub fn label_counts(records: &[HeadlineRecord]) -> LabelCounts {
    records
        .iter()
        .filter_map(|r| r.sentiment_analysis())
        .filter_map(Result::ok)
        .map(|a| a.sentiment)
        .collect()
}

/// A headline-bearing record whose analysis is absent or unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisProblem {
    /// Zero-based position in the dataset.
    pub index: usize,
    pub issue: AnalysisIssue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisIssue {
    Missing,
    Malformed(String),
}

impl fmt::Display for AnalysisProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            AnalysisIssue::Missing => write!(f, "item {}: no sentiment_analysis", self.index + 1),
            AnalysisIssue::Malformed(e) => {
                write!(f, "item {}: malformed sentiment_analysis: {e}", self.index + 1)
            }
        }
    }
}

/// Records with a usable headline but no complete analysis.
///
/// Records without a headline are not reported; they can never be scored.
pub fn find_analysis_problems(records: &[HeadlineRecord]) -> Vec<AnalysisProblem> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.headline().is_ok())
        .filter_map(|(index, r)| {
            let issue = match r.sentiment_analysis() {
                None => AnalysisIssue::Missing,
                Some(Err(e)) => AnalysisIssue::Malformed(e.to_string()),
                Some(Ok(_)) => return None,
            };
            Some(AnalysisProblem { index, issue })
        })
        .collect()
}
