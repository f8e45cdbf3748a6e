//! Tabular model: values, records, frames, dataset names.

pub mod dataset;
pub mod record;
pub mod value;

pub use dataset::DatasetName;
pub use record::{Frame, Record};
pub use value::{format_number, parse_currency, parse_date, Value};
