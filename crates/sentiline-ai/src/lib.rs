//! Sentiment scoring: the VADER polarity scorer, its lexicon, and the
//! annotation pass that attaches results to dataset records.

mod annotator;
pub use annotator::{AnnotationOutcome, Annotator, RecordStatus, UnscorableRecord, pending_records};

mod lexicon;
pub use lexicon::{Lexicon, LexiconError};

mod vader;
pub use vader::{PolarityScorer, VaderScorer};
