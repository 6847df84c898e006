// Numeric coercion of metric and target cells.

use super::error::{LoadError, LoadWarning};
use super::parse::{RawRow, RawTable};
use crate::table::{Cell, Metric, TARGET_COLUMN, TEAM_COLUMN};
use tracing::warn;

/// A row after coercion and before the required-field filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRow {
    /// Team name exactly as it appeared in the file, if any.
    pub team: Option<String>,
    pub year: i32,
    pub metrics: [Cell; Metric::COUNT],
    pub final_position: Cell,
}

/// Parse one text cell. Blank, unparseable and non-finite values are
/// `Absent`; this never fails.
pub fn coerce_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Absent;
    }
    trimmed.parse::<f64>().map_or(Cell::Absent, Cell::from_f64)
}

fn coerce_optional(raw: Option<&str>) -> Cell {
    raw.map_or(Cell::Absent, coerce_cell)
}

fn coerce_row(row: &RawRow) -> CoercedRow {
    let mut metrics = [Cell::Absent; Metric::COUNT];
    for metric in Metric::ALL {
        metrics[metric.index()] = coerce_optional(row.get(metric.column()));
    }
    CoercedRow {
        team: row.get(TEAM_COLUMN).map(str::to_string),
        year: row.year,
        metrics,
        final_position: coerce_optional(row.get(TARGET_COLUMN)),
    }
}

/// Coerce every row of the reconciled union.
///
/// A metric column missing from the whole table is reported once as a
/// `MissingMetricColumn` warning and left all-absent.
pub fn coerce_table(table: &RawTable, warnings: &mut Vec<LoadWarning>) -> Vec<CoercedRow> {
    for metric in Metric::ALL {
        if !table.has_column(metric.column()) {
            let err = LoadError::MissingMetricColumn(metric);
            warn!("{}", err);
            warnings.push(LoadWarning::Recovered(err));
        }
    }
    table.rows().iter().map(coerce_row).collect()
}
