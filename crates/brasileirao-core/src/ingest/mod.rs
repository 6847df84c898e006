// Season-file ingestion: discovery, parsing, reconciliation, coercion and
// cleaning, producing one `CanonicalTable`.
//
// File-level problems are recorded as warnings and the batch continues;
// schema- and result-level problems abort it.

pub mod cache;
pub mod clean;
pub mod coerce;
pub mod discovery;
pub mod error;
pub mod parse;
pub mod reconcile;

pub use cache::{MemoryCache, SourceFingerprint, TableCache};
pub use error::{LoadError, LoadWarning, ParseError};

use crate::config::DataConfig;
use crate::table::CanonicalTable;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where season files live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub dir: PathBuf,
    pub prefix: String,
}

impl DataSource {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        DataSource {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(data: &DataConfig) -> Self {
        DataSource::new(&data.dir, data.file_prefix.clone())
    }
}

/// The canonical table together with everything that went wrong on the way
/// without stopping the load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub table: CanonicalTable,
    pub warnings: Vec<LoadWarning>,
}

/// Run the whole pipeline once.
pub fn load(source: &DataSource) -> Result<LoadOutcome, LoadError> {
    let mut warnings = Vec::new();
    let files = discovery::discover(source, &mut warnings)?;
    load_files(source, &files, warnings)
}

/// Run the pipeline unless `cache` already holds a result for the same
/// directory contents.
pub fn load_cached(source: &DataSource, cache: &dyn TableCache) -> Result<Arc<LoadOutcome>, LoadError> {
    let mut warnings = Vec::new();
    let files = discovery::discover(source, &mut warnings)?;
    let key = SourceFingerprint::new(source, &files);

    if let Some(hit) = cache.get(&key) {
        debug!("reusing cached table for {} file(s)", key.file_count());
        return Ok(hit);
    }

    let outcome = Arc::new(load_files(source, &files, warnings)?);
    cache.insert(key, Arc::clone(&outcome));
    Ok(outcome)
}

/// Pipeline stages after discovery, over an explicit file list.
pub fn load_files(
    source: &DataSource,
    files: &[PathBuf],
    mut warnings: Vec<LoadWarning>,
) -> Result<LoadOutcome, LoadError> {
    if files.is_empty() {
        return Err(LoadError::NoSourceFilesFound {
            pattern: discovery::source_pattern(source),
        });
    }

    let mut seasons = Vec::with_capacity(files.len());
    for path in files {
        match parse::read_season_file(path) {
            Ok(season) => {
                debug!("parsed {} ({} rows)", path.display(), season.rows().len());
                seasons.push(season);
            }
            Err(e) => {
                warn!("skipping file: {}", e);
                warnings.push(LoadWarning::Recovered(e));
            }
        }
    }
    if seasons.is_empty() {
        return Err(LoadError::NoFilesLoaded {
            attempted: files.len(),
        });
    }
    let parsed = seasons.len();

    let combined = reconcile::reconcile_all(seasons)?;
    let rows = coerce::coerce_table(&combined, &mut warnings);
    let table = clean::finalize(rows, &mut warnings)?;

    info!(
        "loaded {} rows for {} teams from {}/{} file(s), seasons {}",
        table.len(),
        table.teams().len(),
        parsed,
        files.len(),
        table.season_range()
    );
    Ok(LoadOutcome { table, warnings })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
