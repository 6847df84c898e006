// Union of season tables and target-column reconciliation.

use super::error::LoadError;
use super::parse::RawTable;
use crate::table::{LEGACY_TARGET_COLUMN, TARGET_COLUMN, TEAM_COLUMN};
use tracing::info;

/// Normalize the historical target rename on one record set.
///
/// `ranking` without `colocacao_final` is renamed; when both are present the
/// canonical column wins and `ranking` is left in place, unused. Applying this
/// twice is the same as applying it once.
pub fn reconcile(mut table: RawTable) -> RawTable {
    if table.has_column(LEGACY_TARGET_COLUMN) && !table.has_column(TARGET_COLUMN) {
        table.rename_column(LEGACY_TARGET_COLUMN, TARGET_COLUMN);
    }
    table
}

/// Concatenate reconciled season tables into one.
pub fn union(tables: impl IntoIterator<Item = RawTable>) -> RawTable {
    let mut combined = RawTable::default();
    for table in tables {
        combined.append(table);
    }
    combined
}

/// Reconcile each season table, union them, and check the columns no
/// canonical record can exist without.
pub fn reconcile_all(tables: Vec<RawTable>) -> Result<RawTable, LoadError> {
    let reconciled = tables.into_iter().map(|table| {
        let renamed = table.has_column(LEGACY_TARGET_COLUMN) && !table.has_column(TARGET_COLUMN);
        if renamed {
            let year = table.rows().first().map(|r| r.year);
            info!(
                "season {:?}: treating legacy `{}` column as `{}`",
                year, LEGACY_TARGET_COLUMN, TARGET_COLUMN
            );
        }
        reconcile(table)
    });
    let combined = union(reconciled);

    if !combined.has_column(TARGET_COLUMN) {
        return Err(LoadError::MissingTargetColumn);
    }
    if !combined.has_column(TEAM_COLUMN) {
        return Err(LoadError::MissingTeamColumn);
    }
    Ok(combined)
}
