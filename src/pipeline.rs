//! End-to-end page pipeline.
//!
//! Every serve and every export walks the same fixed stage order over the
//! in-memory dataset frame:
//!
//! ```text
//! Frame → Access Filter → Page Scope → Query Filter → Blocks / KPIs
//! ```
//!
//! The pipeline is a pure function of `(frame, identity, selection)`:
//! nothing here mutates the dataset, and the caller's identity is a
//! parameter on every call.

use crate::access;
use crate::aggregate::{aggregate, crosstab};
use crate::export::{self, ExportError};
use crate::filter::{apply_facets, apply_scope, FacetSelection};
use crate::model::Frame;
use crate::normalize::ClosingBucket;
use crate::pages::{compute_kpi, Kpi, PageSpec, View};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("page has no block named '{0}'")]
    UnknownBlock(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// A computed block: the frame to present, under the block's name.
#[derive(Debug, Clone, Serialize)]
pub struct NamedFrame {
    pub name: String,
    pub frame: Frame,
}

/// Everything a page serves for one request.
#[derive(Debug, Clone, Serialize)]
pub struct PageOutput {
    pub page: String,
    pub title: String,
    pub kpis: Vec<Kpi>,
    pub blocks: Vec<NamedFrame>,
}

/// Run `page` against a loaded frame for one caller.
pub fn run_page(
    page: &PageSpec,
    frame: &Frame,
    identity: &str,
    selection: &FacetSelection,
) -> PageOutput {
    let filtered = filtered_rows(page, frame, identity, selection);
    let kpis = page
        .kpis
        .iter()
        .map(|def| compute_kpi(&filtered, def))
        .collect();
    let blocks = page
        .blocks
        .iter()
        .map(|block| NamedFrame {
            name: block.name.clone(),
            frame: run_block(&filtered, block),
        })
        .collect();
    PageOutput {
        page: page.name.clone(),
        title: page.title.clone(),
        kpis,
        blocks,
    }
}

/// Serve the CSV export of the page's designated block. `Ok(None)` when the
/// page exports nothing. The export sees exactly the rows the page serves:
/// the access filter has already run by the time the block is computed.
pub fn export_page(
    page: &PageSpec,
    frame: &Frame,
    identity: &str,
    selection: &FacetSelection,
) -> PipelineResult<Option<Vec<u8>>> {
    let Some(block_name) = &page.export else {
        return Ok(None);
    };
    let block = page
        .block(block_name)
        .ok_or_else(|| PipelineError::UnknownBlock(block_name.clone()))?;
    let filtered = filtered_rows(page, frame, identity, selection);
    let out = run_block(&filtered, block);
    Ok(Some(export::to_csv(&out)?))
}

/// The choices each facet offers, computed over the rows the caller may
/// see (so a non-admin identity is never offered another identity's values).
pub fn facet_options(page: &PageSpec, frame: &Frame, identity: &str) -> Vec<(String, Vec<String>)> {
    let visible = match &page.ownership_field {
        Some(field) => access::apply(frame, field, identity),
        None => frame.clone(),
    };
    let visible = apply_scope(&visible, &page.scope);
    page.facets
        .iter()
        .map(|facet| {
            let values = match &facet.kind {
                crate::filter::FacetKind::Field(field) => visible.distinct_values(field),
                crate::filter::FacetKind::Bucket(_) => ClosingBucket::all()
                    .iter()
                    .map(|b| b.as_str().to_string())
                    .collect(),
            };
            (facet.name.clone(), values)
        })
        .collect()
}

/// Access filter, then page scope, then the caller's facet selection.
fn filtered_rows(
    page: &PageSpec,
    frame: &Frame,
    identity: &str,
    selection: &FacetSelection,
) -> Frame {
    let visible = match &page.ownership_field {
        Some(field) => access::apply(frame, field, identity),
        None => frame.clone(),
    };
    let scoped = apply_scope(&visible, &page.scope);
    apply_facets(&scoped, &page.facets, selection)
}

fn run_block(filtered: &Frame, block: &crate::pages::Block) -> Frame {
    let scoped = apply_scope(filtered, &block.scope);
    match &block.view {
        View::Detail(spec) => scoped.select(&spec.columns),
        View::Aggregate(spec) => aggregate(&scoped, spec),
        View::Crosstab(spec) => crosstab(&scoped, spec),
    }
}
