//! Sentiment lexicon: token → mean valence on a `[-4, 4]` scale.
//!
//! Lexicons use VADER's `vader_lexicon.txt` layout: one entry per line,
//! `token<TAB>mean<TAB>stddev<TAB>raw ratings`. Only the first two columns
//! are read, so two-column files work too. The built-in lexicon is compiled
//! from `data/vader_lexicon.txt` in the same layout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

const EMBEDDED_LEXICON: &str = include_str!("../data/vader_lexicon.txt");

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lexicon line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Lexicon {
    /// The built-in lexicon.
    ///
    /// Lines that fail to parse are skipped; the `embedded_data_is_well_formed`
    /// test keeps that set empty.
    pub fn embedded() -> Self {
        let valences = entries(EMBEDDED_LEXICON).filter_map(Result::ok).collect();
        Self { valences }
    }

    /// Load a lexicon file in VADER's tab-separated format.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&text)?;
        info!(path = %path.display(), entries = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }

    /// Parse VADER's tab-separated format. Blank lines are ignored; a later
    /// entry for the same token replaces an earlier one.
    pub fn parse(text: &str) -> Result<Self, LexiconError> {
        let valences = entries(text).collect::<Result<_, _>>()?;
        Ok(Self { valences })
    }

    /// Valence of an already-lowercased token.
    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

fn entries(text: &str) -> impl Iterator<Item = Result<(String, f64), LexiconError>> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(i + 1, line.trim()))
}

fn parse_line(line_no: usize, line: &str) -> Result<(String, f64), LexiconError> {
    let parse_err = |reason: String| LexiconError::Parse {
        line: line_no,
        reason,
    };

    let mut fields = line.split('\t');
    let token = fields.next().unwrap_or_default();
    if token.is_empty() {
        return Err(parse_err("empty token".into()));
    }
    let raw = fields
        .next()
        .ok_or_else(|| parse_err(format!("no valence for {token:?}")))?;
    let valence: f64 = raw
        .trim()
        .parse()
        .map_err(|e| parse_err(format!("bad valence {raw:?}: {e}")))?;
    if !valence.is_finite() {
        return Err(parse_err(format!("valence {raw:?} is not finite")));
    }
    Ok((token.to_string(), valence))
}
