//! Per-page pipeline configuration.
//!
//! Every dashboard page is an instance of the same skeleton: dataset,
//! optional ownership field, fixed scopes, facet definitions, KPI
//! definitions, and named blocks (detail table, aggregate, or crosstab).
//! The nine built-in pages live in [`builtin`].

pub mod builtin;

pub use builtin::{page, registry};

use crate::aggregate::{format_percent, percent_of, round2, AggregateSpec, CrosstabSpec, PercentStyle};
use crate::filter::{FacetDef, Scope};
use crate::model::{format_number, DatasetName, Frame};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One dashboard page, fully described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Stable page identifier (route-like).
    pub name: String,
    pub title: String,
    pub dataset: DatasetName,
    /// Field restricting non-admin identities; `None` when the page's
    /// dataset is not identity-partitioned.
    pub ownership_field: Option<String>,
    /// Fixed row restrictions applied to the whole page, after the access
    /// filter and before the facet filter.
    pub scope: Vec<Scope>,
    pub facets: Vec<FacetDef>,
    pub kpis: Vec<KpiDef>,
    pub blocks: Vec<Block>,
    /// Name of the block served by CSV export; `None` means the page does
    /// not export.
    pub export: Option<String>,
}

impl PageSpec {
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

/// A named view within a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    /// Extra row restriction for this block only.
    pub scope: Vec<Scope>,
    pub view: View,
}

impl Block {
    pub fn detail(name: &str, columns: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            scope: Vec::new(),
            view: View::Detail(DetailSpec {
                columns: columns
                    .iter()
                    .map(|(field, label)| (field.to_string(), label.to_string()))
                    .collect(),
            }),
        }
    }

    pub fn aggregate(name: &str, spec: AggregateSpec) -> Self {
        Self {
            name: name.to_string(),
            scope: Vec::new(),
            view: View::Aggregate(spec),
        }
    }

    pub fn crosstab(name: &str, spec: CrosstabSpec) -> Self {
        Self {
            name: name.to_string(),
            scope: Vec::new(),
            view: View::Crosstab(spec),
        }
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope.push(scope);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum View {
    Detail(DetailSpec),
    Aggregate(AggregateSpec),
    Crosstab(CrosstabSpec),
}

/// A projection of filtered records: `(field, display label)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSpec {
    pub columns: Vec<(String, String)>,
}

/// A KPI card definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDef {
    pub label: String,
    pub kind: KpiKind,
    pub format: KpiFormat,
}

impl KpiDef {
    pub fn new(label: &str, kind: KpiKind, format: KpiFormat) -> Self {
        Self {
            label: label.to_string(),
            kind,
            format,
        }
    }
}

/// How a KPI value is computed over the filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KpiKind {
    RowCount,
    Sum(String),
    /// Mean over non-null values; empty input yields 0.
    Mean(String),
    CountWhere {
        field: String,
        value: String,
    },
    CountDistinct {
        field: String,
        only_if: Option<String>,
    },
    /// Percentage of one KPI value over another (denominator 0 yields 0).
    Ratio {
        numerator: Box<KpiKind>,
        denominator: Box<KpiKind>,
    },
}

impl KpiKind {
    /// Fields this KPI reads, for spec validation.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            KpiKind::RowCount => Vec::new(),
            KpiKind::Sum(field) | KpiKind::Mean(field) => vec![field.as_str()],
            KpiKind::CountWhere { field, .. } => vec![field.as_str()],
            KpiKind::CountDistinct { field, only_if } => {
                let mut fields = vec![field.as_str()];
                if let Some(flag) = only_if {
                    fields.push(flag.as_str());
                }
                fields
            }
            KpiKind::Ratio {
                numerator,
                denominator,
            } => {
                let mut fields = numerator.fields();
                fields.extend(denominator.fields());
                fields
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KpiFormat {
    /// `$1,234` — whole dollars with thousands separators.
    Money0,
    /// `$1,234.50` — dollars with cents.
    Money2,
    /// Plain integer count.
    Count,
    /// Two-decimal number.
    Number2,
    Percent(PercentStyle),
}

/// A computed KPI card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

/// Evaluate a KPI over the filtered rows.
pub fn compute_kpi(frame: &Frame, def: &KpiDef) -> Kpi {
    let value = eval_kind(frame, &def.kind);
    Kpi {
        label: def.label.clone(),
        value: format_kpi(value, def.format),
    }
}

fn eval_kind(frame: &Frame, kind: &KpiKind) -> f64 {
    match kind {
        KpiKind::RowCount => frame.len() as f64,
        KpiKind::Sum(field) => frame
            .rows()
            .iter()
            .map(|r| r.number(field).unwrap_or(0.0))
            .sum(),
        KpiKind::Mean(field) => {
            let values: Vec<f64> = frame
                .rows()
                .iter()
                .filter_map(|r| r.number(field))
                .collect();
            if values.is_empty() {
                0.0
            } else {
                round2(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        KpiKind::CountWhere { field, value } => frame
            .rows()
            .iter()
            .filter(|r| r.canonical(field) == *value)
            .count() as f64,
        KpiKind::CountDistinct { field, only_if } => {
            let mut seen: HashSet<String> = HashSet::new();
            for row in frame.rows() {
                if let Some(flag) = only_if {
                    if !row.flag(flag) {
                        continue;
                    }
                }
                if !row.is_blank(field) {
                    seen.insert(row.canonical(field));
                }
            }
            seen.len() as f64
        }
        KpiKind::Ratio {
            numerator,
            denominator,
        } => percent_of(eval_kind(frame, numerator), eval_kind(frame, denominator)),
    }
}

/// Render a KPI value.
pub fn format_kpi(value: f64, format: KpiFormat) -> String {
    match format {
        KpiFormat::Money0 => format!("${}", thousands(value.round(), 0)),
        KpiFormat::Money2 => format!("${}", thousands(value, 2)),
        KpiFormat::Count => format_number(value.round()),
        KpiFormat::Number2 => format!("{:.2}", value),
        KpiFormat::Percent(style) => format_percent(round2(value), style),
    }
}

/// Thousands-separated rendering with a fixed number of decimals.
fn thousands(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut grouped = String::new();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
