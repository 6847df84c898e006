// Per-team history and comparison against the league.

use super::stats::mean;
use super::trends::league_mean;
use crate::reindex::{reindex_team, reindex_values, SeasonPoint};
use crate::table::{CanonicalTable, Cell, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

/// A team's placement history over the whole dataset range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamProfile {
    pub team: String,
    pub seasons_played: usize,
    /// Lowest placement number reached (1 = champion).
    pub best_position: f64,
    /// Mean placement over the seasons the team actually played.
    pub mean_position: f64,
    pub series: Vec<SeasonPoint>,
}

/// Returns `None` when the team has no records.
pub fn team_profile(table: &CanonicalTable, team: &str) -> Option<TeamProfile> {
    let positions: Vec<f64> = table.for_team(team).map(|r| r.final_position).collect();
    let mean_position = mean(&positions)?;
    let best_position = positions.iter().copied().fold(f64::INFINITY, f64::min);
    Some(TeamProfile {
        team: team.to_string(),
        seasons_played: positions.len(),
        best_position,
        mean_position,
        series: reindex_team(table, team, table.season_range()),
    })
}

/// One season of a team-vs-league comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub year: i32,
    pub team: Cell,
    pub league: Cell,
}

/// The team's value of `metric` next to the league mean, for every season in
/// the dataset range. The team side keeps its gaps.
pub fn compare_with_league(table: &CanonicalTable, team: &str, metric: Metric) -> Vec<ComparisonPoint> {
    let range = table.season_range();
    let team_values: BTreeMap<i32, f64> = table.for_team(team).map(|r| (r.year, r.metrics[metric])).collect();
    let league = league_mean(table, metric);

    reindex_values(&team_values, range)
        .into_iter()
        .zip(reindex_values(&league, range))
        .map(|((year, team), (_, league))| ComparisonPoint { year, team, league })
        .collect()
}
