//! # Sightline
//!
//! The data-derivation pipeline behind a multi-page CRM business-intelligence
//! dashboard.
//!
//! ## Architecture
//!
//! Every page is the same skeleton with page-specific configuration:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Row Source (sqlite / csv)                   │
//! │         DEALS, INVOICES, ACCOUNTS raw frames             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Normalized Frame (derived calendar fields,          │
//! │        cleaned numerics, coalesced categories)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [access → scope → filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Rows visible to the caller's identity,            │
//! │         restricted by the facet selection                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [aggregate]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Detail / aggregate / crosstab blocks + KPI cards       │
//! │              → presenter, CSV export                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Presentation (HTML, charts, HTTP transport, authentication) is an
//! external collaborator; [`pipeline::run_page`] and
//! [`pipeline::export_page`] are the boundary it calls.

pub mod access;
pub mod aggregate;
pub mod config;
pub mod export;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod pages;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{
        aggregate, crosstab, AggregateSpec, CrosstabSpec, Denominator, DerivedExpr, MeasureKind,
        OutputOrder, PercentStyle,
    };
    pub use crate::config::Settings;
    pub use crate::filter::{FacetDef, FacetSelection, Scope};
    pub use crate::model::{DatasetName, Frame, Record, Value};
    pub use crate::pages::{page, registry, Block, KpiDef, KpiFormat, KpiKind, PageSpec};
    pub use crate::pipeline::{export_page, facet_options, run_page, PageOutput};
    pub use crate::source::{CsvSource, RowSource, SqliteSource};
    pub use crate::store::DatasetStore;
}

// Also export at crate root for convenience
pub use filter::FacetSelection;
pub use model::{DatasetName, Frame, Record, Value};
pub use pipeline::{export_page, run_page, PageOutput};
pub use store::DatasetStore;
