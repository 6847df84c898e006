// Integration tests for the season loader.
//
// These run the whole pipeline (discovery, parsing, reconciliation, coercion,
// cleaning) over the CSV fixtures and check the views built on its output.

use brasileirao_core::analysis::{correlation_matrix, overview, team_profile, yearly_means};
use brasileirao_core::ingest::{
    discovery, load, load_files, DataSource, LoadError, LoadWarning,
};
use brasileirao_core::reindex::reindex_team;
use brasileirao_core::table::{Cell, Metric, SeasonRange};
use std::path::PathBuf;

// ===========================================================================
// Test helpers
// ===========================================================================

const PREFIX: &str = "team_statistics_brasileirao";

fn fixtures() -> DataSource {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/seasons");
    DataSource::new(dir, PREFIX)
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn loads_fixture_seasons() {
    let outcome = load(&fixtures()).expect("fixtures should load");
    let table = &outcome.table;

    assert_eq!(table.len(), 13);
    assert_eq!(table.teams().len(), 9);
    assert_eq!(table.season_range(), SeasonRange::new(2014, 2016).unwrap());

    let summary = overview(table);
    assert_eq!(summary.rows, 13);
    assert_eq!(summary.teams, 9);
}

#[test]
fn bad_files_reported_as_warnings() {
    let outcome = load(&fixtures()).unwrap();
    let warnings = &outcome.warnings;
    assert_eq!(warnings.len(), 3, "warnings: {warnings:?}");

    match &warnings[0] {
        LoadWarning::Recovered(LoadError::FileParseFailure { path, .. }) => {
            assert!(path.ends_with("team_statistics_brasileirao_2013.csv"));
        }
        other => panic!("expected 2013 parse failure, got: {other}"),
    }
    match &warnings[1] {
        LoadWarning::Recovered(LoadError::MalformedFilename { path, .. }) => {
            assert!(path.ends_with("team_statistics_brasileirao_latest.csv"));
        }
        other => panic!("expected malformed filename, got: {other}"),
    }
    assert!(matches!(warnings[2], LoadWarning::RowsDropped { count: 1 }));
}

#[test]
fn file_order_does_not_matter() {
    let source = fixtures();
    let mut files = discovery::discover(&source, &mut Vec::new()).unwrap();
    let forward = load_files(&source, &files, Vec::new()).unwrap();
    files.reverse();
    let backward = load_files(&source, &files, Vec::new()).unwrap();

    assert_eq!(forward.table.sorted(), backward.table.sorted());
}

// -- Reconciliation --

#[test]
fn legacy_ranking_season_uses_ranking_as_target() {
    let outcome = load(&fixtures()).unwrap();
    let cruzeiro_2014 = outcome
        .table
        .iter()
        .find(|r| r.team == "Cruzeiro" && r.year == 2014)
        .expect("prefixed name should be cleaned");
    assert_eq!(cruzeiro_2014.final_position, 1.0);
    assert_eq!(cruzeiro_2014.metrics[Metric::Gols], 67.0);
}

#[test]
fn canonical_column_wins_over_stale_ranking() {
    let outcome = load(&fixtures()).unwrap();
    let santos = outcome
        .table
        .iter()
        .find(|r| r.team == "Santos" && r.year == 2016)
        .unwrap();
    assert_eq!(santos.final_position, 2.0);
}

#[test]
fn reordered_columns_read_by_name() {
    let outcome = load(&fixtures()).unwrap();
    let corinthians = outcome
        .table
        .iter()
        .find(|r| r.team == "Corinthians")
        .unwrap();
    assert_eq!(corinthians.year, 2015);
    assert_eq!(corinthians.final_position, 1.0);
    assert_eq!(corinthians.metrics[Metric::PosseDeBola], 56.0);
    assert_eq!(corinthians.metrics[Metric::PassesCertos], 13120.0);
}

// -- Cleaning --

#[test]
fn ordinal_prefixes_removed() {
    let outcome = load(&fixtures()).unwrap();
    let teams = outcome.table.teams();
    assert!(teams.contains(&"São Paulo"));
    assert!(teams.iter().all(|t| !t.starts_with(|c: char| c.is_ascii_digit())));
}

#[test]
fn non_numeric_metric_row_dropped() {
    let outcome = load(&fixtures()).unwrap();
    assert!(!outcome.table.has_team("Vasco"));
}

// -- Views --

#[test]
fn flamengo_series_has_2015_gap() {
    let outcome = load(&fixtures()).unwrap();
    let table = &outcome.table;
    let series = reindex_team(table, "Flamengo", table.season_range());

    let years: Vec<i32> = series.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2014, 2015, 2016]);
    assert_eq!(series[0].final_position, Cell::Number(3.0));
    assert!(series[1].is_gap());
    assert_eq!(series[1].metric(Metric::Gols), Cell::Absent);
    assert_eq!(series[2].final_position, Cell::Number(5.0));

    let profile = team_profile(table, "Flamengo").unwrap();
    assert_eq!(profile.seasons_played, 2);
    assert_eq!(profile.best_position, 3.0);
}

#[test]
fn yearly_means_cover_every_season() {
    let outcome = load(&fixtures()).unwrap();
    let means = yearly_means(&outcome.table);
    let years: Vec<i32> = means.iter().map(|m| m.year).collect();
    assert_eq!(years, vec![2014, 2015, 2016]);
    assert_eq!(means[1].teams, 4);
}

#[test]
fn goals_correlate_negatively_with_placement() {
    let outcome = load(&fixtures()).unwrap();
    let matrix = correlation_matrix(&outcome.table);
    let r = matrix
        .get("gols", "colocacao_final")
        .and_then(Cell::value)
        .expect("goals vary across the fixtures");
    assert!(r < 0.0, "r = {r}");
}

// -- Fatal conditions --

#[test]
fn missing_directory_finds_no_files() {
    let source = DataSource::new(std::env::temp_dir().join("pipeline_test_no_such_dir"), PREFIX);
    match load(&source) {
        Err(LoadError::NoSourceFilesFound { pattern }) => {
            assert!(pattern.ends_with("team_statistics_brasileirao_*.csv"));
        }
        other => panic!("expected NoSourceFilesFound, got: {other:?}"),
    }
}

#[test]
fn other_prefix_finds_no_files() {
    let mut source = fixtures();
    source.prefix = "player_statistics".into();
    assert!(matches!(load(&source), Err(LoadError::NoSourceFilesFound { .. })));
}
