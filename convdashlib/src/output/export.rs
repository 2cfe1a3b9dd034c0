//! Delimited (CSV) export of tables.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::ConvdashError;
use crate::Result;

use super::table::{ColumnLabels, Table};

/// Serialize a table to CSV: a header row of display names, then one line per row.
pub fn to_delimited(table: &Table, labels: &ColumnLabels) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(labels.headers(table))?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| ConvdashError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ConvdashError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write a table's CSV form to `path`.
pub fn write_delimited(table: &Table, labels: &ColumnLabels, path: &Path) -> Result<()> {
    let content = to_delimited(table, labels)?;
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), rows = table.rows.len(), "exported table");
    Ok(())
}
