// Plain-text rendering of the analysis views.

use crate::predict::Prediction;
use brasileirao_core::analysis::{ComparisonPoint, CorrelationMatrix, MetricSummary, Overview, TeamProfile, YearlyMean};
use brasileirao_core::table::{display_name, CanonicalTable, Metric, TARGET_COLUMN};
use std::fmt::Write;

/// `4.6` -> `"5º"`. Never below first place.
pub fn ordinal(placement: f64) -> String {
    format!("{}º", placement.round().max(1.0) as i64)
}

pub fn overview(view: &Overview, summaries: &[MetricSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rows:    {}", view.rows);
    let _ = writeln!(out, "Teams:   {}", view.teams);
    let _ = writeln!(out, "Seasons: {} ({} seasons)", view.seasons, view.seasons.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<18} {:>10} {:>10} {:>10}", "Metric", "Min", "Median", "Max");
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<18} {:>10.1} {:>10.1} {:>10.1}",
            s.metric.label(),
            s.min,
            s.median,
            s.max
        );
    }
    out
}

/// Every row, ordered by team then year, under the source column names.
pub fn table(table: &CanonicalTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<22} {:>4}", "equipe", "ano");
    for metric in Metric::ALL {
        let _ = write!(out, " {:>15}", metric.column());
    }
    let _ = writeln!(out, " {:>15}", TARGET_COLUMN);
    for record in table.sorted() {
        let _ = write!(out, "{:<22} {:>4}", record.team, record.year);
        for (_, value) in record.metrics.iter() {
            let _ = write!(out, " {:>15}", value);
        }
        let _ = writeln!(out, " {:>15}", record.final_position);
    }
    out
}

pub fn trends(means: &[YearlyMean], metrics: &[Metric]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>4} {:>5}", "Year", "Teams");
    for metric in metrics {
        let _ = write!(out, " {:>16}", metric.label());
    }
    let _ = writeln!(out, " {:>16}", display_name(TARGET_COLUMN));
    for year in means {
        let _ = write!(out, "{:>4} {:>5}", year.year, year.teams);
        for metric in metrics {
            let _ = write!(out, " {:>16.2}", year.metric(*metric));
        }
        let _ = writeln!(out, " {:>16.2}", year.final_position);
    }
    out
}

pub fn correlations(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<16}", "");
    for column in &matrix.columns {
        let _ = write!(out, " {:>15}", column);
    }
    let _ = writeln!(out);
    for (column, row) in matrix.columns.iter().zip(&matrix.cells) {
        let _ = write!(out, "{:<16}", column);
        for cell in row {
            let _ = write!(out, " {:>15.2}", cell);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Against {}:", display_name(TARGET_COLUMN));
    for (metric, cell) in matrix.against_target() {
        let _ = writeln!(out, "  {:<18} {:>6.2}", metric.label(), cell);
    }
    out
}

pub fn scatter(metric: Metric, pairs: &[(f64, f64)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>16} {:>16}", metric.label(), display_name(TARGET_COLUMN));
    for (value, placement) in pairs {
        let _ = writeln!(out, "{:>16} {:>16}", value, placement);
    }
    out
}

pub fn team(profile: &TeamProfile, metric: Metric, comparison: &[ComparisonPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.team);
    let _ = writeln!(out, "  Seasons played: {}", profile.seasons_played);
    let _ = writeln!(out, "  Best placement: {}", ordinal(profile.best_position));
    let _ = writeln!(out, "  Mean placement: {:.1}", profile.mean_position);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4} {:>10} {:>16} {:>16}",
        "Year",
        "Placement",
        metric.label(),
        "League mean"
    );
    for (point, versus) in profile.series.iter().zip(comparison) {
        let placement = match point.final_position.value() {
            Some(p) => ordinal(p),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:>4} {:>10} {:>16.1} {:>16.1}",
            point.year, placement, versus.team, versus.league
        );
    }
    out
}

pub fn prediction(prediction: &Prediction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Inputs:");
    for (metric, value) in &prediction.inputs {
        let _ = writeln!(out, "  {:<18} {:>10.1}", metric.label(), value);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Predicted placement: {} ({:.2})",
        ordinal(prediction.placement),
        prediction.placement
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Feature importance:");
    for (name, weight) in &prediction.importances {
        let _ = writeln!(out, "  {:<18} {:>6.1}%", display_name(name), weight * 100.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brasileirao_core::analysis::{compare_with_league, correlation_matrix, team_profile};
    use brasileirao_core::table::{CanonicalRecord, MetricValues, SeasonRange};

    fn record(team: &str, year: i32, final_position: f64, gols: f64) -> CanonicalRecord {
        CanonicalRecord {
            team: team.into(),
            year,
            metrics: MetricValues::new([gols, 80.0, 4.0, 50.0, 11000.0, 1500.0]),
            final_position,
        }
    }

    fn sample() -> CanonicalTable {
        CanonicalTable::new(vec![
            record("Flamengo", 2014, 3.0, 46.0),
            record("Flamengo", 2016, 5.0, 52.0),
            record("Santos", 2015, 7.0, 50.0),
            record("Santos", 2016, 2.0, 58.0),
        ])
        .unwrap()
    }

    #[test]
    fn ordinal_rounds_and_clamps() {
        assert_eq!(ordinal(4.6), "5º");
        assert_eq!(ordinal(1.2), "1º");
        assert_eq!(ordinal(0.3), "1º");
        assert_eq!(ordinal(19.5), "20º");
    }

    #[test]
    fn overview_lists_every_metric() {
        let view = Overview {
            rows: 4,
            teams: 2,
            seasons: SeasonRange::new(2014, 2016).unwrap(),
        };
        let summaries = brasileirao_core::analysis::summarize_all(&sample());
        let text = overview(&view, &summaries);
        assert!(text.contains("Seasons: 2014-2016 (3 seasons)"));
        assert!(text.contains("Posse De Bola"));
        assert_eq!(text.lines().count(), 4 + 1 + Metric::COUNT);
    }

    #[test]
    fn team_view_marks_missing_season() {
        let table = sample();
        let profile = team_profile(&table, "Flamengo").unwrap();
        let comparison = compare_with_league(&table, "Flamengo", Metric::Gols);
        let text = team(&profile, Metric::Gols, &comparison);
        let gap = text.lines().find(|l| l.trim_start().starts_with("2015")).unwrap();
        assert!(gap.contains(" - "));
        assert!(text.contains("Best placement: 3º"));
    }

    #[test]
    fn correlations_show_absent_as_dash() {
        let text = correlations(&correlation_matrix(&sample()));
        let line = text.lines().find(|l| l.contains("Cartao Vermelho")).unwrap();
        assert!(line.trim_end().ends_with('-'));
    }

    #[test]
    fn raw_table_has_one_line_per_record() {
        let text = table(&sample());
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().next().unwrap().starts_with("equipe"));
    }

    #[test]
    fn prediction_lists_importances_with_labels() {
        let p = Prediction {
            placement: 4.6,
            inputs: vec![(Metric::Gols, 60.0)],
            importances: vec![("posse_de_bola".into(), 0.75), ("gols".into(), 0.25)],
        };
        let text = prediction(&p);
        assert!(text.contains("Predicted placement: 5º (4.60)"));
        assert!(text.contains("Posse De Bola"));
        assert!(text.contains("75.0%"));
    }
}
