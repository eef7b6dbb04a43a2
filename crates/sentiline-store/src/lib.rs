//! Storage layer: the headline dataset as a flat JSON file, bootstrapped from a seed.

mod error;
pub use error::StoreError;

mod dataset;
pub use dataset::{
    DatasetSource, DatasetStore, LoadedDataset, parse_dataset, parse_seed, read_dataset,
    read_seed, write_dataset,
};
