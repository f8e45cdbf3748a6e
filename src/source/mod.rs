//! Row-source boundary: query-by-dataset-name providers of raw frames.
//!
//! Errors from this boundary never propagate into page logic: a failed fetch
//! is logged and degrades to an empty frame carrying the dataset's expected
//! schema, so every page runs on empty input without crashing.

pub mod csv_file;
pub mod sqlite;

pub use csv_file::CsvSource;
pub use sqlite::SqliteSource;

use crate::model::{DatasetName, Frame};
use std::path::PathBuf;
use tracing::warn;

/// Errors at the row-source boundary.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Abstract provider of raw tabular records per logical dataset.
pub trait RowSource {
    fn fetch(&self, dataset: DatasetName) -> SourceResult<Frame>;
}

/// Fetch a dataset, degrading any source failure to an empty frame with the
/// dataset's expected raw schema.
pub fn fetch_or_empty(source: &dyn RowSource, dataset: DatasetName) -> Frame {
    match source.fetch(dataset) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(dataset = %dataset, error = %err, "dataset fetch failed, serving empty frame");
            Frame::from_columns(dataset.raw_columns())
        }
    }
}
