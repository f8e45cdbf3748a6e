//! Exporter: serialize a frame to comma-delimited text.
//!
//! Header row carries the exact display column names; numeric values render
//! unquoted; dates render as `YYYY-MM-DD`; nulls render empty. No trailing
//! metadata. The frame is untouched.

use crate::model::Frame;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv flush failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Serialize `frame` to CSV bytes.
pub fn to_csv(frame: &Frame) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(frame.columns())?;
    for row in frame.rows() {
        let cells: Vec<String> = frame
            .columns()
            .iter()
            .map(|column| row.canonical(column))
            .collect();
        writer.write_record(&cells)?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
