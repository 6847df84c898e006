// Season-complete reindexing for per-team series.
//
// A year with no record means the team was not in the top division that
// season. It stays an explicit gap: no interpolation, no forward fill.

use crate::table::{CanonicalTable, Cell, Metric, SeasonRange};
use serde::Serialize;
use std::collections::BTreeMap;

/// One season of a team's dense series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonPoint {
    pub year: i32,
    pub final_position: Cell,
    pub metrics: [Cell; Metric::COUNT],
}

impl SeasonPoint {
    fn gap(year: i32) -> Self {
        SeasonPoint {
            year,
            final_position: Cell::Absent,
            metrics: [Cell::Absent; Metric::COUNT],
        }
    }

    pub fn metric(&self, metric: Metric) -> Cell {
        self.metrics[metric.index()]
    }

    /// True when the team has no record for this season.
    pub fn is_gap(&self) -> bool {
        self.final_position.is_absent()
    }
}

/// Dense series for `team` over `range`: exactly `range.len()` points in
/// ascending year order. An unknown team yields all gaps.
pub fn reindex_team(table: &CanonicalTable, team: &str, range: SeasonRange) -> Vec<SeasonPoint> {
    let by_year: BTreeMap<i32, SeasonPoint> = table
        .for_team(team)
        .filter(|r| range.contains(r.year))
        .map(|r| {
            let mut metrics = [Cell::Absent; Metric::COUNT];
            for (slot, (_, value)) in metrics.iter_mut().zip(r.metrics.iter()) {
                *slot = Cell::Number(value);
            }
            let point = SeasonPoint {
                year: r.year,
                final_position: Cell::Number(r.final_position),
                metrics,
            };
            (r.year, point)
        })
        .collect();

    range
        .years()
        .map(|year| by_year.get(&year).cloned().unwrap_or_else(|| SeasonPoint::gap(year)))
        .collect()
}

/// Spread sparse per-year values over `range`, absent where no value exists.
pub fn reindex_values(values: &BTreeMap<i32, f64>, range: SeasonRange) -> Vec<(i32, Cell)> {
    range
        .years()
        .map(|year| (year, Cell::from(values.get(&year).copied())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::record;

    fn flamengo_table() -> CanonicalTable {
        CanonicalTable::new(vec![
            record("Flamengo", 2014, 3.0, [46.0, 90.0, 7.0, 51.3, 10478.0, 1711.0]),
            record("Flamengo", 2016, 5.0, [52.0, 81.0, 6.0, 55.0, 12011.0, 1522.0]),
            record("Santos", 2015, 7.0, [50.0, 70.0, 2.0, 52.0, 11000.0, 1500.0]),
        ])
        .unwrap()
    }

    #[test]
    fn missing_season_is_explicit_gap() {
        let table = flamengo_table();
        let range = table.season_range();
        let series = reindex_team(&table, "Flamengo", range);

        let placements: Vec<(i32, Cell)> = series.iter().map(|p| (p.year, p.final_position)).collect();
        assert_eq!(
            placements,
            vec![
                (2014, Cell::Number(3.0)),
                (2015, Cell::Absent),
                (2016, Cell::Number(5.0)),
            ]
        );
        assert!(series[1].is_gap());
        assert!(series[1].metrics.iter().all(|c| c.is_absent()));
        assert_eq!(series[2].metric(Metric::Gols), Cell::Number(52.0));
    }

    #[test]
    fn every_team_gets_full_range() {
        let table = flamengo_table();
        let range = table.season_range();
        for team in table.teams() {
            assert_eq!(reindex_team(&table, team, range).len(), range.len());
        }
        assert_eq!(reindex_team(&table, "Ceará", range).len(), range.len());
    }

    #[test]
    fn wider_range_pads_both_ends() {
        let table = flamengo_table();
        let range = SeasonRange::new(2013, 2017).unwrap();
        let series = reindex_team(&table, "Santos", range);
        let years: Vec<i32> = series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2013, 2014, 2015, 2016, 2017]);
        let present: Vec<bool> = series.iter().map(|p| !p.is_gap()).collect();
        assert_eq!(present, vec![false, false, true, false, false]);
    }

    #[test]
    fn values_reindexed_with_gaps() {
        let values = BTreeMap::from([(2014, 1.5), (2016, 2.5)]);
        let range = SeasonRange::new(2014, 2016).unwrap();
        assert_eq!(
            reindex_values(&values, range),
            vec![(2014, Cell::Number(1.5)), (2015, Cell::Absent), (2016, Cell::Number(2.5))]
        );
    }
}
