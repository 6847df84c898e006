// Team-name cleaning and the required-field row filter.

use super::coerce::CoercedRow;
use super::error::{LoadError, LoadWarning};
use crate::table::{CanonicalRecord, CanonicalTable, Metric, MetricValues};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Leading rank prefixes such as `3. ` or `12.`; repeated prefixes are
/// removed together so cleaning a clean name changes nothing.
static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.\s*)+").expect("ordinal prefix regex is valid"));

/// `"3. São Paulo"` -> `"São Paulo"`; names without a prefix only get trimmed.
pub fn clean_team_name(raw: &str) -> String {
    ORDINAL_PREFIX.replace(raw.trim(), "").trim().to_string()
}

fn to_record(row: CoercedRow) -> Option<CanonicalRecord> {
    let team = clean_team_name(row.team.as_deref()?);
    if team.is_empty() {
        return None;
    }
    let final_position = row.final_position.value()?;
    let mut metrics = [0.0; Metric::COUNT];
    for (slot, cell) in metrics.iter_mut().zip(row.metrics) {
        *slot = cell.value()?;
    }
    Some(CanonicalRecord {
        team,
        year: row.year,
        metrics: MetricValues::new(metrics),
        final_position,
    })
}

/// Clean names, drop incomplete rows, and build the canonical table.
///
/// Fails when nothing survives the filter or when a team appears twice in
/// one season.
pub fn finalize(rows: Vec<CoercedRow>, warnings: &mut Vec<LoadWarning>) -> Result<CanonicalTable, LoadError> {
    let total = rows.len();
    let records: Vec<CanonicalRecord> = rows.into_iter().filter_map(to_record).collect();

    let dropped = total - records.len();
    if dropped > 0 {
        let warning = LoadWarning::RowsDropped { count: dropped };
        warn!("{}", warning);
        warnings.push(warning);
    }

    CanonicalTable::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn row(team: Option<&str>, year: i32, position: Cell, metric: Cell) -> CoercedRow {
        let mut metrics = [Cell::Number(1.0); Metric::COUNT];
        metrics[Metric::PosseDeBola.index()] = metric;
        CoercedRow {
            team: team.map(str::to_string),
            year,
            metrics,
            final_position: position,
        }
    }

    // -- Team names --

    #[test]
    fn ordinal_prefix_stripped() {
        assert_eq!(clean_team_name("3. São Paulo"), "São Paulo");
        assert_eq!(clean_team_name("12.Grêmio"), "Grêmio");
        assert_eq!(clean_team_name("  1.   Cruzeiro  "), "Cruzeiro");
    }

    #[test]
    fn names_without_prefix_unchanged() {
        assert_eq!(clean_team_name("Grêmio"), "Grêmio");
        assert_eq!(clean_team_name("Atlético-MG"), "Atlético-MG");
        assert_eq!(clean_team_name("América 2"), "América 2");
    }

    #[test]
    fn cleaning_is_idempotent() {
        for raw in ["3. São Paulo", "Grêmio", " 4. 5. Sport ", "7.", "  Bahia", "1.Vitória "] {
            let once = clean_team_name(raw);
            assert_eq!(clean_team_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    // -- Row filter --

    #[test]
    fn incomplete_rows_dropped_others_kept() {
        let rows = vec![
            row(Some("Corinthians"), 2015, Cell::Number(1.0), Cell::Number(55.8)),
            row(Some("Vasco"), 2015, Cell::Number(18.0), Cell::Absent),
            row(Some("Grêmio"), 2015, Cell::Absent, Cell::Number(54.0)),
            row(Some("  "), 2015, Cell::Number(4.0), Cell::Number(50.0)),
            row(None, 2015, Cell::Number(5.0), Cell::Number(50.0)),
        ];
        let mut warnings = Vec::new();
        let table = finalize(rows, &mut warnings).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].team, "Corinthians");
        assert!(matches!(warnings[..], [LoadWarning::RowsDropped { count: 4 }]));
    }

    #[test]
    fn nothing_surviving_is_fatal() {
        let rows = vec![row(Some("Vasco"), 2015, Cell::Number(18.0), Cell::Absent)];
        let err = finalize(rows, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyResultAfterCleaning));
    }

    #[test]
    fn duplicates_detected_after_name_cleaning() {
        let rows = vec![
            row(Some("3. Flamengo"), 2015, Cell::Number(3.0), Cell::Number(50.0)),
            row(Some("Flamengo"), 2015, Cell::Number(3.0), Cell::Number(50.0)),
        ];
        let err = finalize(rows, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateTeamSeason { .. }));
    }

    #[test]
    fn no_warning_when_nothing_dropped() {
        let rows = vec![row(Some("Santos"), 2016, Cell::Number(2.0), Cell::Number(54.6))];
        let mut warnings = Vec::new();
        finalize(rows, &mut warnings).unwrap();
        assert!(warnings.is_empty());
    }
}
