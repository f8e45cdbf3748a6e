// src/source/sqlite.rs
use crate::model::{DatasetName, Frame, Record, Value};
use crate::source::{RowSource, SourceResult};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::PathBuf;

/// Row source backed by a SQLite database with one table per dataset.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for SqliteSource {
    fn fetch(&self, dataset: DatasetName) -> SourceResult<Frame> {
        let conn = Connection::open(&self.path)?;
        let sql = format!("SELECT * FROM \"{}\"", dataset.table());
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut frame = Frame::new(columns.clone());
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (idx, column) in columns.iter().enumerate() {
                let value = match row.get_ref(idx)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => Value::Number(n as f64),
                    ValueRef::Real(n) => Value::Number(n),
                    ValueRef::Text(bytes) => {
                        Value::Text(String::from_utf8_lossy(bytes).into_owned())
                    }
                    ValueRef::Blob(_) => Value::Null,
                };
                record.set(column.clone(), value);
            }
            frame.push(record);
        }
        Ok(frame)
    }
}
