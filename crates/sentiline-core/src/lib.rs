//! Core types for Sentiline: headline records, sentiment labels, and dataset summaries.

pub mod record;
pub mod sentiment;
pub mod summary;

pub use record::{
    AnalysisIssue, AnalysisProblem, HEADLINE_KEY, HeadlineIssue, HeadlineRecord,
    SENTIMENT_ANALYSIS_KEY, SentimentAnalysis, find_analysis_problems, label_counts,
};
pub use sentiment::{
    LabelCounts, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, ParseSentimentError, PolarityScores,
    Sentiment,
};
pub use summary::{DatasetSummary, ScoredHeadline, SummaryOptions};
