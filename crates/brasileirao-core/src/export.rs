// Writing the canonical table back out as CSV or JSON.

use crate::table::CanonicalTable;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format `{other}` (expected csv or json)")),
        }
    }
}

/// Rows in (team, year) order, one header line with the source column names.
pub fn write_csv<W: Write>(table: &CanonicalTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in table.sorted() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed array of row objects in (team, year) order.
pub fn write_json<W: Write>(table: &CanonicalTable, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, &table.sorted())?;
    writeln!(writer)?;
    Ok(())
}

pub fn write<W: Write>(table: &CanonicalTable, format: ExportFormat, writer: W) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(table, writer),
        ExportFormat::Json => write_json(table, writer),
    }
}
