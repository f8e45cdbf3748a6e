// src/model/record.rs
use crate::model::value::Value;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// One row: a field-name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The value for `field`, with missing fields read as null.
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or(Value::Null)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_number)
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        self.get(field).and_then(Value::as_date)
    }

    /// Canonical cell text for `field`; empty string when absent or null.
    pub fn canonical(&self, field: &str) -> String {
        self.get(field).map(Value::canonical).unwrap_or_default()
    }

    /// Whether a boolean-flag field (stored as 0/1) is set.
    pub fn flag(&self, field: &str) -> bool {
        self.number(field).is_some_and(|n| n != 0.0)
    }

    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map(Value::is_blank).unwrap_or(true)
    }
}

/// An ordered column list plus a record sequence. The unit flowing through
/// every pipeline stage. An empty frame keeps its schema so downstream
/// consumers always see the expected columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// An empty frame with the same schema.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Record> {
        &mut self.rows
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new frame holding the rows that satisfy `pred`, same schema.
    pub fn filtered(&self, pred: impl Fn(&Record) -> bool) -> Frame {
        Frame {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    /// Project onto `(field, label)` pairs, renaming columns to labels.
    pub fn select(&self, columns: &[(String, String)]) -> Frame {
        let out_columns: Vec<String> = columns.iter().map(|(_, label)| label.clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut out = Record::new();
                for (field, label) in columns {
                    out.set(label.clone(), r.value(field));
                }
                out
            })
            .collect();
        Frame {
            columns: out_columns,
            rows,
        }
    }

    /// Distinct non-blank canonical values of a column, sorted.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if row.is_blank(field) {
                continue;
            }
            let v = row.canonical(field);
            if !seen.contains(&v) {
                seen.push(v);
            }
        }
        seen.sort();
        seen
    }
}
