// src/aggregate/pivot.rs
use crate::model::{Frame, Record, Value};
use crate::normalize::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Two-key grouping in long form for stacked visualizations: one row per
/// (primary, secondary) pair with its count, optionally with the count's
/// share of the primary group's total for proportional stacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabSpec {
    pub primary: String,
    pub secondary: String,
    /// Output name of the count column.
    pub count_name: String,
    /// Output name of the per-primary share column, when wanted.
    pub shares: Option<String>,
}

impl CrosstabSpec {
    pub fn new(primary: &str, secondary: &str, count_name: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            count_name: count_name.to_string(),
            shares: None,
        }
    }

    pub fn with_shares(mut self, name: &str) -> Self {
        self.shares = Some(name.to_string());
        self
    }
}

/// Cross-tabulate `frame`. Primary keys are ordered descending by their
/// total count (the stacked-chart ordering), secondary keys ascending within
/// each primary. Empty input yields an empty frame with the output schema.
pub fn crosstab(frame: &Frame, spec: &CrosstabSpec) -> Frame {
    let mut counts: HashMap<(String, String), f64> = HashMap::new();
    let mut primary_totals: HashMap<String, f64> = HashMap::new();
    for row in frame.rows() {
        let primary = key_of(row, &spec.primary);
        let secondary = key_of(row, &spec.secondary);
        *counts.entry((primary.clone(), secondary)).or_insert(0.0) += 1.0;
        *primary_totals.entry(primary).or_insert(0.0) += 1.0;
    }

    let mut primaries: Vec<String> = primary_totals.keys().cloned().collect();
    primaries.sort_by(|a, b| {
        let ta = primary_totals[a];
        let tb = primary_totals[b];
        tb.partial_cmp(&ta)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(b))
    });

    let mut columns = vec![spec.primary.clone(), spec.secondary.clone(), spec.count_name.clone()];
    if let Some(share_name) = &spec.shares {
        columns.push(share_name.clone());
    }
    let mut out = Frame::new(columns);

    for primary in &primaries {
        let mut pairs: Vec<(&String, f64)> = counts
            .iter()
            .filter(|((p, _), _)| p == primary)
            .map(|((_, s), count)| (s, *count))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        let total = primary_totals[primary];
        for (secondary, count) in pairs {
            let mut row = Record::new();
            row.set(spec.primary.clone(), Value::text(primary.clone()));
            row.set(spec.secondary.clone(), Value::text(secondary.clone()));
            row.set(spec.count_name.clone(), Value::Number(count));
            if let Some(share_name) = &spec.shares {
                let share = if total == 0.0 { 0.0 } else { count / total };
                row.set(share_name.clone(), Value::Number(share));
            }
            out.push(row);
        }
    }
    out
}

fn key_of(row: &Record, field: &str) -> String {
    if row.is_blank(field) {
        UNKNOWN.to_string()
    } else {
        row.canonical(field)
    }
}
