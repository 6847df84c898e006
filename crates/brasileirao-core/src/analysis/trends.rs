// League-wide yearly averages.

use super::stats::mean;
use crate::table::{CanonicalTable, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

/// Group-by-year means for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMean {
    pub year: i32,
    pub teams: usize,
    pub metrics: [f64; Metric::COUNT],
    pub final_position: f64,
}

impl YearlyMean {
    pub fn metric(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }
}

/// One entry per season that has data, ascending by year.
pub fn yearly_means(table: &CanonicalTable) -> Vec<YearlyMean> {
    let mut by_year: BTreeMap<i32, Vec<_>> = BTreeMap::new();
    for record in table {
        by_year.entry(record.year).or_default().push(record);
    }

    by_year
        .into_iter()
        .map(|(year, records)| {
            let mut metrics = [0.0; Metric::COUNT];
            for metric in Metric::ALL {
                let values: Vec<f64> = records.iter().map(|r| r.metrics[metric]).collect();
                metrics[metric.index()] = mean(&values).unwrap_or(f64::NAN);
            }
            let positions: Vec<f64> = records.iter().map(|r| r.final_position).collect();
            YearlyMean {
                year,
                teams: records.len(),
                metrics,
                final_position: mean(&positions).unwrap_or(f64::NAN),
            }
        })
        .collect()
}

/// League mean of one metric per season.
pub fn league_mean(table: &CanonicalTable, metric: Metric) -> BTreeMap<i32, f64> {
    yearly_means(table)
        .into_iter()
        .map(|y| (y.year, y.metric(metric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::record;

    #[test]
    fn means_grouped_by_year() {
        let table = CanonicalTable::new(vec![
            record("Palmeiras", 2016, 1.0, [62.0, 73.0, 3.0, 53.0, 11902.0, 1566.0]),
            record("Santos", 2016, 2.0, [58.0, 75.0, 4.0, 55.0, 12230.0, 1480.0]),
            record("Santos", 2014, 7.0, [50.0, 70.0, 2.0, 52.0, 11000.0, 1500.0]),
        ])
        .unwrap();

        let means = yearly_means(&table);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].year, 2014);
        assert_eq!(means[0].teams, 1);
        assert_eq!(means[1].year, 2016);
        assert!((means[1].metric(Metric::Gols) - 60.0).abs() < 1e-12);
        assert!((means[1].metric(Metric::PosseDeBola) - 54.0).abs() < 1e-12);
        assert!((means[1].final_position - 1.5).abs() < 1e-12);

        let gols = league_mean(&table, Metric::Gols);
        assert_eq!(gols.keys().copied().collect::<Vec<_>>(), vec![2014, 2016]);
        assert!((gols[&2014] - 50.0).abs() < 1e-12);
    }
}
