// Dataset overview and per-metric summaries.

use super::stats::median;
use crate::table::{CanonicalTable, Metric, SeasonRange};
use serde::Serialize;

/// Headline figures for a loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub rows: usize,
    pub teams: usize,
    pub seasons: SeasonRange,
}

pub fn overview(table: &CanonicalTable) -> Overview {
    Overview {
        rows: table.len(),
        teams: table.teams().len(),
        seasons: table.season_range(),
    }
}

/// Observed spread of one metric. The predictor uses `min`/`max` as input
/// bounds and `median` as the default input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

pub fn summarize(table: &CanonicalTable, metric: Metric) -> MetricSummary {
    let values: Vec<f64> = table.iter().map(|r| r.metrics[metric]).collect();
    // The table is never empty, so every fold below sees at least one value.
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    MetricSummary {
        metric,
        min,
        max,
        median: median(&values).unwrap_or(min),
    }
}

pub fn summarize_all(table: &CanonicalTable) -> Vec<MetricSummary> {
    Metric::ALL.into_iter().map(|m| summarize(table, m)).collect()
}
