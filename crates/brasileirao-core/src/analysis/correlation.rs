// Correlation matrix over the numeric columns (year excluded).

use super::stats::pearson;
use crate::table::{CanonicalTable, Cell, Metric, TARGET_COLUMN};
use serde::Serialize;

/// Square matrix of Pearson coefficients. Columns are the six metrics in
/// `Metric::ALL` order followed by the final placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    pub cells: Vec<Vec<Cell>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<Cell> {
        let i = self.columns.iter().position(|c| *c == row)?;
        let j = self.columns.iter().position(|c| *c == column)?;
        Some(self.cells[i][j])
    }

    /// Each metric's coefficient against the final placement. Negative means
    /// more of the metric goes with a better (lower) placement.
    pub fn against_target(&self) -> Vec<(Metric, Cell)> {
        Metric::ALL
            .into_iter()
            .map(|m| (m, self.get(m.column(), TARGET_COLUMN).unwrap_or(Cell::Absent)))
            .collect()
    }
}

fn numeric_columns(table: &CanonicalTable) -> Vec<(&'static str, Vec<f64>)> {
    let mut columns: Vec<(&'static str, Vec<f64>)> = Metric::ALL
        .into_iter()
        .map(|m| (m.column(), table.iter().map(|r| r.metrics[m]).collect()))
        .collect();
    columns.push((TARGET_COLUMN, table.iter().map(|r| r.final_position).collect()));
    columns
}

pub fn correlation_matrix(table: &CanonicalTable) -> CorrelationMatrix {
    let columns = numeric_columns(table);
    let cells = columns
        .iter()
        .map(|(_, xs)| columns.iter().map(|(_, ys)| pearson(xs, ys)).collect())
        .collect();
    CorrelationMatrix {
        columns: columns.into_iter().map(|(name, _)| name).collect(),
        cells,
    }
}

/// (metric value, final placement) pairs for a scatter of one metric.
pub fn scatter(table: &CanonicalTable, metric: Metric) -> Vec<(f64, f64)> {
    table
        .iter()
        .map(|r| (r.metrics[metric], r.final_position))
        .collect()
}
