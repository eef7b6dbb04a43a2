//! Flat-JSON dataset store.
//!
//! The dataset is a single JSON array of record objects. When it does not
//! exist yet, it is bootstrapped in memory from a plain-text seed file with
//! one headline per line. Writes go to a temporary file in the same directory
//! and are renamed over the dataset, so the file on disk is always either the
//! previous or the new content.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sentiline_core::HeadlineRecord;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::StoreError;

/// Where the working set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    /// Parsed from an existing dataset file.
    Existing,
    /// Built from the seed file because no dataset existed.
    Seeded,
}

/// Records loaded for one run.
#[derive(Debug)]
pub struct LoadedDataset {
    pub records: Vec<HeadlineRecord>,
    pub source: DatasetSource,
}

/// Dataset file plus the seed file used to create it.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dataset_path: PathBuf,
    seed_path: PathBuf,
}

impl DatasetStore {
    pub fn new(dataset_path: impl Into<PathBuf>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            seed_path: seed_path.into(),
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    /// Load the dataset, or build it from the seed file if it does not exist.
    ///
    /// Nothing is written here; a seeded dataset only reaches disk through
    /// [`persist`](Self::persist).
    pub fn load_or_bootstrap(&self) -> Result<LoadedDataset, StoreError> {
        if self.dataset_path.exists() {
            let records = read_dataset(&self.dataset_path)?;
            return Ok(LoadedDataset {
                records,
                source: DatasetSource::Existing,
            });
        }

        if !self.seed_path.exists() {
            return Err(StoreError::MissingInput {
                dataset: self.dataset_path.clone(),
                seed: self.seed_path.clone(),
            });
        }

        info!(
            dataset = %self.dataset_path.display(),
            seed = %self.seed_path.display(),
            "dataset not found, bootstrapping from seed"
        );
        let records = read_seed(&self.seed_path)?;
        Ok(LoadedDataset {
            records,
            source: DatasetSource::Seeded,
        })
    }

    /// Replace the dataset file with `records`.
    pub fn persist(&self, records: &[HeadlineRecord]) -> Result<(), StoreError> {
        write_dataset(&self.dataset_path, records)
    }
}

/// Read and validate an existing dataset file.
pub fn read_dataset(path: &Path) -> Result<Vec<HeadlineRecord>, StoreError> {
    if !path.exists() {
        return Err(StoreError::DatasetNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(StoreError::io(path))?;
    let records = parse_dataset(&bytes, path)?;
    info!(path = %path.display(), count = records.len(), "loaded dataset");
    Ok(records)
}

/// Parse dataset bytes: a JSON array whose every element is an object.
///
/// `path` is only used for error reporting.
pub fn parse_dataset(bytes: &[u8], path: &Path) -> Result<Vec<HeadlineRecord>, StoreError> {
    let malformed = |reason: String| StoreError::MalformedDataset {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(malformed(format!(
                "expected a JSON array of records, found {}",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(HeadlineRecord::from_fields(fields)),
            other => Err(malformed(format!(
                "element {i} is {}, expected an object",
                kind(&other)
            ))),
        })
        .collect()
}

/// Read a seed file into unscored records.
pub fn read_seed(path: &Path) -> Result<Vec<HeadlineRecord>, StoreError> {
    let text = fs::read_to_string(path).map_err(StoreError::io(path))?;
    let records = parse_seed(&text);
    info!(path = %path.display(), count = records.len(), "read seed headlines");
    Ok(records)
}

/// One record per non-blank line, with surrounding whitespace trimmed.
pub fn parse_seed(text: &str) -> Vec<HeadlineRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(HeadlineRecord::new)
        .collect()
}

/// Serialise `records` as a pretty-printed JSON array and atomically replace `path`.
///
/// If `path` already exists its permissions are carried over to the new file.
pub fn write_dataset(path: &Path, records: &[HeadlineRecord]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(StoreError::io(dir))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(StoreError::io(tmp.path()))?;
    }

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush().map_err(StoreError::io(tmp.path()))?;
    }
    tmp.as_file().sync_all().map_err(StoreError::io(tmp.path()))?;
    debug!(tmp = %tmp.path().display(), "wrote temporary dataset");

    tmp.persist(path)
        .map_err(|e| StoreError::io(path)(e.error))?;
    info!(path = %path.display(), count = records.len(), "persisted dataset");
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiline_core::{PolarityScores, SentimentAnalysis};
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> DatasetStore {
        DatasetStore::new(
            tmp.path().join("data.json"),
            tmp.path().join("initial_data.txt"),
        )
    }

    #[test]
    fn seed_skips_blank_lines_and_trims() {
        let records = parse_seed("Great product\n\n   \n  Terrible service  \r\n");
        let headlines: Vec<&str> = records.iter().map(|r| r.headline().unwrap()).collect();
        assert_eq!(headlines, ["Great product", "Terrible service"]);
        assert!(records.iter().all(|r| !r.is_scored()));
    }

    #[test]
    fn empty_seed_gives_empty_dataset() {
        assert!(parse_seed("").is_empty());
        assert!(parse_seed("\n\n").is_empty());
    }

    #[test]
    fn bootstrap_from_seed_without_writing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.seed_path(), "Great product\n\nTerrible service\n").unwrap();

        let loaded = store.load_or_bootstrap().unwrap();
        assert_eq!(loaded.source, DatasetSource::Seeded);
        assert_eq!(loaded.records.len(), 2);
        assert!(!store.dataset_path().exists(), "bootstrap must not write");
    }

    #[test]
    fn existing_dataset_wins_over_seed() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.seed_path(), "from seed\n").unwrap();
        fs::write(store.dataset_path(), r#"[{"headline": "from dataset"}]"#).unwrap();

        let loaded = store.load_or_bootstrap().unwrap();
        assert_eq!(loaded.source, DatasetSource::Existing);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].headline(), Ok("from dataset"));
    }

    #[test]
    fn missing_both_inputs() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let result = store.load_or_bootstrap();
        assert!(matches!(result, Err(StoreError::MissingInput { .. })));
    }

    #[test]
    fn not_json_is_malformed() {
        let result = parse_dataset(b"not json", Path::new("data.json"));
        assert!(matches!(result, Err(StoreError::MalformedDataset { .. })));
    }

    #[test]
    fn non_array_is_malformed() {
        let result = parse_dataset(br#"{"headline": "x"}"#, Path::new("data.json"));
        match result {
            Err(StoreError::MalformedDataset { reason, .. }) => {
                assert!(reason.contains("an object"), "{reason}");
            }
            other => panic!("expected MalformedDataset, got {other:?}"),
        }
    }

    #[test]
    fn non_object_element_is_malformed() {
        let result = parse_dataset(br#"[{"headline": "x"}, "y"]"#, Path::new("data.json"));
        match result {
            Err(StoreError::MalformedDataset { reason, .. }) => {
                assert!(reason.contains("element 1"), "{reason}");
            }
            other => panic!("expected MalformedDataset, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let result = parse_dataset(&[b'[', 0xff, b']'], Path::new("data.json"));
        assert!(matches!(result, Err(StoreError::MalformedDataset { .. })));
    }

    #[test]
    fn empty_array_is_valid() {
        let records = parse_dataset(b"[]", Path::new("data.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_file_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.dataset_path(), "not json").unwrap();

        assert!(store.load_or_bootstrap().is_err());
        assert_eq!(fs::read_to_string(store.dataset_path()).unwrap(), "not json");
    }

    #[test]
    fn read_only_load_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = read_dataset(&tmp.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::DatasetNotFound(_))));
    }

    #[test]
    fn persist_roundtrip_preserves_fields_and_order() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let mut scored = HeadlineRecord::new("Great product");
        scored.attach_analysis(SentimentAnalysis::from_scores(PolarityScores {
            negative: 0.0,
            neutral: 0.196,
            positive: 0.804,
            compound: 0.6249,
        }));
        let extra = HeadlineRecord::from_fields(
            json!({"startup": "Acme", "headline": "Plain", "revenue": 1500, "tags": ["b2b"]})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let records = vec![scored, extra];

        store.persist(&records).unwrap();
        let reloaded = read_dataset(store.dataset_path()).unwrap();
        assert_eq!(reloaded, records);

        let keys: Vec<&str> = reloaded[1].fields().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["startup", "headline", "revenue", "tags"]);
    }

    #[test]
    fn persist_writes_two_space_indented_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        write_dataset(&path, &[HeadlineRecord::new("x")]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n  {\n    \"headline\": \"x\"\n  }\n]");
    }

    #[test]
    fn persist_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(&path, "[]").unwrap();

        write_dataset(&path, &[HeadlineRecord::new("new")]).unwrap();
        let reloaded = read_dataset(&path).unwrap();
        assert_eq!(reloaded.len(), 1);

        // Only the dataset remains; the temporary file was renamed away.
        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
