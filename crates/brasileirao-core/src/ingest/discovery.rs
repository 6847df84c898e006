// Season file discovery: `<dir>/<prefix>_<year>.csv`, non-recursive.

use super::error::{LoadError, LoadWarning, ParseError};
use super::DataSource;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Glob pattern for the source files. The directory and prefix are escaped
/// so metacharacters in them match literally.
pub fn source_pattern(source: &DataSource) -> String {
    let dir = source.dir.to_string_lossy();
    let dir = if dir.is_empty() { ".".into() } else { dir };
    format!(
        "{}/{}_*.csv",
        glob::Pattern::escape(dir.trim_end_matches(['/', '\\'])),
        glob::Pattern::escape(&source.prefix)
    )
}

/// List matching files in lexicographic order. An empty list is not an error
/// here; the pipeline decides what an empty list means.
///
/// Entries the glob walker cannot read are skipped and recorded as
/// `FileParseFailure` warnings.
pub fn discover(source: &DataSource, warnings: &mut Vec<LoadWarning>) -> Result<Vec<PathBuf>, LoadError> {
    let pattern = source_pattern(source);
    let entries = glob::glob(&pattern).map_err(|e| LoadError::InvalidSourcePattern {
        pattern: pattern.clone(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!("ignoring non-file match {}", path.display()),
            Err(e) => {
                let path = e.path().to_path_buf();
                let err = LoadError::FileParseFailure {
                    path,
                    source: ParseError::Io(e.into_error()),
                };
                warn!("{}", err);
                warnings.push(LoadWarning::Recovered(err));
            }
        }
    }
    files.sort();
    debug!("discovered {} file(s) matching {}", files.len(), pattern);
    Ok(files)
}
