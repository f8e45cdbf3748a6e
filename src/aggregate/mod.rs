//! Aggregator: one-key grouping with counts, sums, distinct counts, derived
//! columns, ratio columns, and a synthetic Total row.
//!
//! The Total row's numeric columns are column-wise sums of the non-total
//! rows; its derived and ratio columns are recomputed from those sums, never
//! averaged from per-group values.

pub mod pivot;

pub use pivot::{crosstab, CrosstabSpec};

use crate::model::{Frame, Record, Value};
use crate::normalize::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Group-key label of the synthetic totals row.
pub const TOTAL_LABEL: &str = "Total";

/// A one-key aggregation: group by `key`, compute measures, derived columns
/// and ratios, optionally append the Total row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// Grouping key column.
    pub key: String,
    /// Output column name for the key; defaults to the key itself.
    pub key_label: Option<String>,
    pub measures: Vec<MeasureDef>,
    pub derived: Vec<DerivedDef>,
    pub ratios: Vec<RatioDef>,
    pub order: OutputOrder,
    pub total_row: bool,
    /// Explicit output column order; defaults to key, measures, derived,
    /// ratios in declaration order.
    pub columns: Option<Vec<String>>,
}

impl AggregateSpec {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            key_label: None,
            measures: Vec::new(),
            derived: Vec::new(),
            ratios: Vec::new(),
            order: OutputOrder::KeyAscending,
            total_row: false,
            columns: None,
        }
    }

    pub fn measure(mut self, name: &str, kind: MeasureKind) -> Self {
        self.measures.push(MeasureDef {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn derive(mut self, name: &str, expr: DerivedExpr) -> Self {
        self.derived.push(DerivedDef {
            name: name.to_string(),
            expr,
        });
        self
    }

    pub fn ratio(mut self, name: &str, numerator: &str, denominator: Denominator, style: PercentStyle) -> Self {
        self.ratios.push(RatioDef {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator,
            style,
        });
        self
    }

    pub fn order(mut self, order: OutputOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_total(mut self) -> Self {
        self.total_row = true;
        self
    }

    pub fn column_order(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    fn output_columns(&self) -> Vec<String> {
        if let Some(columns) = &self.columns {
            return columns.clone();
        }
        let mut columns = vec![self.key_column().to_string()];
        columns.extend(self.measures.iter().map(|m| m.name.clone()));
        columns.extend(self.derived.iter().map(|d| d.name.clone()));
        columns.extend(self.ratios.iter().map(|r| r.name.clone()));
        columns
    }

    pub fn key_column(&self) -> &str {
        self.key_label.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDef {
    pub name: String,
    pub kind: MeasureKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasureKind {
    /// Row count.
    Count,
    /// Sum of a numeric field (nulls count as 0).
    Sum(String),
    /// Distinct non-null values of an identifier field, optionally
    /// restricted to rows where a 0/1 flag field is set.
    CountDistinct {
        field: String,
        only_if: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDef {
    pub name: String,
    pub expr: DerivedExpr,
}

/// Arithmetic over already-computed group columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DerivedExpr {
    Sub(String, String),
    /// Quotient as a plain fraction; denominator 0 yields 0.
    Div(String, String),
    /// Fraction of the column's maximum across non-total rows (chart share
    /// scaling); maximum 0 yields 0.
    DivByMax(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioDef {
    pub name: String,
    pub numerator: String,
    pub denominator: Denominator,
    pub style: PercentStyle,
}

/// Where a ratio's denominator comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Denominator {
    /// Another column of the same row.
    Column(String),
    /// The grand total of a column ("% of grand total" semantics).
    ColumnTotal(String),
}

/// Rendering of a percentage cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentStyle {
    /// `50.0%`, `66.67%`: two decimals with one trailing zero trimmed.
    Trimmed,
    /// `100.00%`: always two decimals.
    TwoDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputOrder {
    /// Ascending by group key (the default grouping order).
    KeyAscending,
    /// Descending by a measure column, ties broken by key.
    MeasureDescending(String),
    /// Ascending by a measure column, ties broken by key.
    MeasureAscending(String),
    /// Order of first appearance in the input.
    FirstSeen,
}

/// `100 * numerator / denominator`, rounded to two decimals; denominator 0
/// yields 0, never NaN.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round2(100.0 * numerator / denominator)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an already-rounded percentage value.
pub fn format_percent(value: f64, style: PercentStyle) -> String {
    match style {
        PercentStyle::TwoDecimal => format!("{:.2}%", value),
        PercentStyle::Trimmed => {
            let fixed = format!("{:.2}", value);
            let trimmed = fixed.strip_suffix('0').unwrap_or(&fixed);
            format!("{trimmed}%")
        }
    }
}

/// Group `frame` per `spec`.
///
/// Empty input with a Total row requested yields the single Total row with
/// zero measures and 0 ratios; without one it yields an empty frame with the
/// output schema.
pub fn aggregate(frame: &Frame, spec: &AggregateSpec) -> Frame {
    let groups = collect_groups(frame, &spec.key);

    let mut keyed: Vec<(String, Vec<f64>)> = groups
        .iter()
        .map(|(key, rows)| (key.clone(), compute_measures(rows, &spec.measures)))
        .collect();

    match &spec.order {
        OutputOrder::KeyAscending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        OutputOrder::MeasureDescending(name) => {
            let idx = measure_index(spec, name);
            keyed.sort_by(|a, b| {
                b.1[idx]
                    .partial_cmp(&a.1[idx])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        }
        OutputOrder::MeasureAscending(name) => {
            let idx = measure_index(spec, name);
            keyed.sort_by(|a, b| {
                a.1[idx]
                    .partial_cmp(&b.1[idx])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        }
        OutputOrder::FirstSeen => {}
    }

    // Column-wise sums feed both the Total row and grand-total ratios.
    let measure_count = spec.measures.len();
    let mut totals = vec![0.0; measure_count];
    for (_, measures) in &keyed {
        for (idx, value) in measures.iter().enumerate() {
            totals[idx] += value;
        }
    }
    let maxima: Vec<f64> = (0..measure_count)
        .map(|idx| {
            keyed
                .iter()
                .map(|(_, m)| m[idx])
                .fold(0.0_f64, f64::max)
        })
        .collect();

    let mut out = Frame::new(spec.output_columns());
    for (key, measures) in &keyed {
        out.push(build_row(spec, key, measures, &totals, &maxima));
    }
    if spec.total_row {
        out.push(build_row(spec, TOTAL_LABEL, &totals, &totals, &maxima));
    }
    out
}

/// Groups in first-seen order; null keys coalesce to the fixed default so
/// grouping keys are never null in output.
fn collect_groups<'a>(frame: &'a Frame, key: &str) -> Vec<(String, Vec<&'a Record>)> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<&Record>> = HashMap::new();
    for row in frame.rows() {
        let cell = if row.is_blank(key) {
            UNKNOWN.to_string()
        } else {
            row.canonical(key)
        };
        if !buckets.contains_key(&cell) {
            order.push(cell.clone());
        }
        buckets.entry(cell).or_default().push(row);
    }
    order
        .into_iter()
        .map(|key| {
            let rows = buckets.remove(&key).unwrap_or_default();
            (key, rows)
        })
        .collect()
}

fn compute_measures(rows: &[&Record], measures: &[MeasureDef]) -> Vec<f64> {
    measures
        .iter()
        .map(|measure| match &measure.kind {
            MeasureKind::Count => rows.len() as f64,
            MeasureKind::Sum(field) => rows.iter().map(|r| r.number(field).unwrap_or(0.0)).sum(),
            MeasureKind::CountDistinct { field, only_if } => {
                let mut seen: HashSet<String> = HashSet::new();
                for row in rows {
                    if let Some(flag) = only_if {
                        if !row.flag(flag) {
                            continue;
                        }
                    }
                    match row.get(field) {
                        None | Some(Value::Null) => {}
                        Some(value) => {
                            seen.insert(value.canonical());
                        }
                    }
                }
                seen.len() as f64
            }
        })
        .collect()
}

fn measure_index(spec: &AggregateSpec, name: &str) -> usize {
    spec.measures
        .iter()
        .position(|m| m.name == name)
        .unwrap_or(0)
}

fn build_row(
    spec: &AggregateSpec,
    key: &str,
    measures: &[f64],
    totals: &[f64],
    maxima: &[f64],
) -> Record {
    let mut cells: HashMap<&str, f64> = HashMap::new();
    for (def, value) in spec.measures.iter().zip(measures) {
        cells.insert(def.name.as_str(), *value);
    }
    let total_of = |name: &str| -> f64 {
        spec.measures
            .iter()
            .position(|m| m.name == name)
            .map(|idx| totals[idx])
            .unwrap_or(0.0)
    };
    let max_of = |name: &str| -> f64 {
        spec.measures
            .iter()
            .position(|m| m.name == name)
            .map(|idx| maxima[idx])
            .unwrap_or(0.0)
    };

    let mut row = Record::new();
    row.set(spec.key_column().to_string(), Value::text(key));
    for (def, value) in spec.measures.iter().zip(measures) {
        row.set(def.name.clone(), Value::Number(*value));
    }
    for derived in &spec.derived {
        let value = match &derived.expr {
            DerivedExpr::Sub(a, b) => {
                cells.get(a.as_str()).copied().unwrap_or(0.0)
                    - cells.get(b.as_str()).copied().unwrap_or(0.0)
            }
            DerivedExpr::Div(a, b) => {
                let num = cells.get(a.as_str()).copied().unwrap_or(0.0);
                let den = cells.get(b.as_str()).copied().unwrap_or(0.0);
                if den == 0.0 {
                    0.0
                } else {
                    num / den
                }
            }
            DerivedExpr::DivByMax(a) => {
                let num = cells.get(a.as_str()).copied().unwrap_or(0.0);
                let den = max_of(a);
                if den == 0.0 {
                    0.0
                } else {
                    num / den
                }
            }
        };
        cells.insert(derived.name.as_str(), value);
        row.set(derived.name.clone(), Value::Number(value));
    }
    for ratio in &spec.ratios {
        let num = cells.get(ratio.numerator.as_str()).copied().unwrap_or(0.0);
        let den = match &ratio.denominator {
            Denominator::Column(name) => cells.get(name.as_str()).copied().unwrap_or(0.0),
            Denominator::ColumnTotal(name) => total_of(name),
        };
        let pct = percent_of(num, den);
        row.set(ratio.name.clone(), Value::text(format_percent(pct, ratio.style)));
    }
    row
}
