// Error and warning types for the ingestion pipeline.

use crate::table::{Metric, LEGACY_TARGET_COLUMN, TARGET_COLUMN, TEAM_COLUMN};
use std::fmt;
use std::path::PathBuf;

/// Why a single source file could not be read as a season table.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("file has no header row")]
    NoHeader,

    #[error("column `{0}` appears more than once in the header")]
    DuplicateColumn(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(
        "no source files matched `{pattern}`; expected CSV files named \
         <prefix>_<year>.csv (e.g. team_statistics_brasileirao_2015.csv) \
         directly inside the configured data directory"
    )]
    NoSourceFilesFound { pattern: String },

    #[error("invalid source file pattern `{pattern}`: {source}")]
    InvalidSourcePattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to parse {path}: {source}")]
    FileParseFailure { path: PathBuf, source: ParseError },

    #[error("cannot read a season year from {path}: {reason}")]
    MalformedFilename { path: PathBuf, reason: String },

    #[error(
        "{attempted} source file(s) found but none could be loaded; check that \
         each file is a comma-separated UTF-8 table with a header row"
    )]
    NoFilesLoaded { attempted: usize },

    #[error(
        "no target column found: every season file needs a `{canonical}` \
         (or legacy `{legacy}`) column holding the final league placement",
        canonical = TARGET_COLUMN,
        legacy = LEGACY_TARGET_COLUMN
    )]
    MissingTargetColumn,

    #[error(
        "no team column found: every season file needs a `{column}` column",
        column = TEAM_COLUMN
    )]
    MissingTeamColumn,

    #[error("metric column `{0}` not found in any season file; all its rows will be dropped")]
    MissingMetricColumn(Metric),

    #[error(
        "no rows left after cleaning: every row was missing the final placement \
         or one of the metrics gols, cartao_amarelo, cartao_vermelho, \
         posse_de_bola, passes_certos, disputa_aerea"
    )]
    EmptyResultAfterCleaning,

    #[error(
        "duplicate rows for the same team and season ({}); each season file \
         must list a team at most once and each year must come from one file",
        format_pairs(.duplicates)
    )]
    DuplicateTeamSeason { duplicates: Vec<(String, i32)> },
}

impl LoadError {
    /// Whether the pipeline can carry on after this condition.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoadError::FileParseFailure { .. }
                | LoadError::MalformedFilename { .. }
                | LoadError::MissingMetricColumn(_)
        )
    }
}

fn format_pairs(pairs: &[(String, i32)]) -> String {
    pairs
        .iter()
        .map(|(team, year)| format!("{team} {year}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-fatal condition met while loading. Returned next to the table.
#[derive(Debug)]
pub enum LoadWarning {
    /// A recoverable `LoadError` (skipped file or missing metric column).
    Recovered(LoadError),
    /// Rows removed by the required-field filter.
    RowsDropped { count: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Recovered(e) => write!(f, "{e}"),
            LoadWarning::RowsDropped { count } => write!(
                f,
                "dropped {count} row(s) with a missing or non-numeric placement, metric or team name"
            ),
        }
    }
}
