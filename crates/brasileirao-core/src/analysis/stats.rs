// Small descriptive statistics shared by the analysis views.

use crate::table::Cell;

/// Threshold below which a standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Mean and population standard deviation of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Returns `None` for an empty slice.
pub fn column_stats(values: &[f64]) -> Option<ColumnStats> {
    let mean = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(ColumnStats {
        mean,
        stdev: variance.sqrt(),
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with linear interpolation between the two middle values for an
/// even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Pearson correlation of two equally long series.
///
/// `Absent` when the lengths differ, fewer than two pairs exist, or either
/// series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Cell {
    if xs.len() != ys.len() || xs.len() < 2 {
        return Cell::Absent;
    }
    let (Some(x), Some(y)) = (column_stats(xs), column_stats(ys)) else {
        return Cell::Absent;
    };
    if x.stdev < STDEV_EPSILON || y.stdev < STDEV_EPSILON {
        return Cell::Absent;
    }
    let n = xs.len() as f64;
    let covariance = xs
        .iter()
        .zip(ys)
        .map(|(a, b)| (a - x.mean) * (b - y.mean))
        .sum::<f64>()
        / n;
    Cell::from_f64((covariance / (x.stdev * y.stdev)).clamp(-1.0, 1.0))
}
