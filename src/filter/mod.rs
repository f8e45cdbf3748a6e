//! Query filter: user-selected facet filters and fixed page scopes.
//!
//! Facets combine with logical AND across names; the values inside one facet
//! are a set-membership test (an OR). The sentinel value `"All"` anywhere in
//! a facet's selection disables that facet.

use crate::model::{Frame, Record};
use crate::normalize::ClosingBucket;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wildcard selection value: disables the facet it appears in.
pub const ALL: &str = "All";

/// Facet name to selected values, supplied by the presenter per request.
/// An absent or empty facet imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetSelection {
    values: HashMap<String, Vec<String>>,
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, facet: impl Into<String>, values: &[&str]) -> Self {
        self.values
            .insert(facet.into(), values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn set(&mut self, facet: impl Into<String>, values: Vec<String>) {
        self.values.insert(facet.into(), values);
    }

    pub fn get(&self, facet: &str) -> Option<&[String]> {
        self.values.get(facet).map(Vec::as_slice)
    }

    /// Whether this facet restricts anything: non-empty and not wildcarded.
    fn restricts(&self, facet: &str) -> bool {
        match self.values.get(facet) {
            Some(values) => !values.is_empty() && !values.iter().any(|v| v == ALL),
            None => false,
        }
    }
}

/// A filter dimension a page exposes to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetDef {
    pub name: String,
    pub kind: FacetKind,
}

impl FacetDef {
    pub fn field(name: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FacetKind::Field(field.to_string()),
        }
    }

    pub fn bucket(name: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FacetKind::Bucket(field.to_string()),
        }
    }

    pub fn matched_field(&self) -> &str {
        match &self.kind {
            FacetKind::Field(field) | FacetKind::Bucket(field) => field,
        }
    }
}

/// How a facet matches rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacetKind {
    /// Set membership over a field's canonical value.
    Field(String),
    /// Closing-month bucket facet: the field holds precomputed bucket
    /// tokens, so the composite OR across sub-conditions is plain set
    /// membership. Selections may use tokens or display labels.
    Bucket(String),
}

/// A fixed row restriction baked into a page or block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scope {
    /// Keep rows whose field value is one of `values`.
    FieldIn { field: String, values: Vec<String> },
    /// Keep rows where every listed field is present and non-blank.
    RequireFields(Vec<String>),
}

impl Scope {
    pub fn field_in(field: &str, values: &[&str]) -> Self {
        Scope::FieldIn {
            field: field.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn require(fields: &[&str]) -> Self {
        Scope::RequireFields(fields.iter().map(|f| f.to_string()).collect())
    }

    fn keeps(&self, row: &Record) -> bool {
        match self {
            Scope::FieldIn { field, values } => {
                let cell = row.canonical(field);
                values.iter().any(|v| *v == cell)
            }
            Scope::RequireFields(fields) => fields.iter().all(|f| !row.is_blank(f)),
        }
    }
}

/// Apply a page's or block's fixed scopes.
pub fn apply_scope(frame: &Frame, scopes: &[Scope]) -> Frame {
    if scopes.is_empty() {
        return frame.clone();
    }
    frame.filtered(|row| scopes.iter().all(|s| s.keeps(row)))
}

/// Apply the caller's facet selection over the page's facet definitions.
pub fn apply_facets(frame: &Frame, facets: &[FacetDef], selection: &FacetSelection) -> Frame {
    let active: Vec<(&FacetDef, Vec<String>)> = facets
        .iter()
        .filter(|facet| selection.restricts(&facet.name))
        .map(|facet| {
            let raw = selection.get(&facet.name).unwrap_or(&[]);
            (facet, canonical_selection(facet, raw))
        })
        .collect();
    if active.is_empty() {
        return frame.clone();
    }
    frame.filtered(|row| {
        active.iter().all(|(facet, wanted)| {
            let cell = row.canonical(facet.matched_field());
            wanted.iter().any(|v| *v == cell)
        })
    })
}

/// Bucket facets accept display labels ("This Month") as well as tokens.
fn canonical_selection(facet: &FacetDef, raw: &[String]) -> Vec<String> {
    match &facet.kind {
        FacetKind::Field(_) => raw.to_vec(),
        FacetKind::Bucket(_) => raw
            .iter()
            .map(|v| match v.parse::<ClosingBucket>() {
                Ok(bucket) => bucket.as_str().to_string(),
                Err(_) => v.clone(),
            })
            .collect(),
    }
}
