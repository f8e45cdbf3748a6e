// src/source/csv_file.rs
use crate::model::{DatasetName, Frame, Record, Value};
use crate::source::{RowSource, SourceError, SourceResult};
use std::path::PathBuf;

/// Row source reading one CSV file per dataset from a data directory
/// (`DEALS.csv`, `INVOICES.csv`, `ACCOUNTS.csv`).
///
/// All cells load as text (blank cells as null); the normalizer coerces
/// numeric and date fields afterwards.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RowSource for CsvSource {
    fn fetch(&self, dataset: DatasetName) -> SourceResult<Frame> {
        let path = self.dir.join(format!("{}.csv", dataset.table()));
        if !path.exists() {
            return Err(SourceError::FileNotFound(path));
        }
        let mut reader = csv::Reader::from_path(&path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut frame = Frame::new(columns.clone());
        for result in reader.records() {
            let row = result?;
            let mut record = Record::new();
            for (idx, column) in columns.iter().enumerate() {
                let cell = row.get(idx).unwrap_or("");
                let value = if cell.trim().is_empty() {
                    Value::Null
                } else {
                    Value::Text(cell.to_string())
                };
                record.set(column.clone(), value);
            }
            frame.push(record);
        }
        Ok(frame)
    }
}
