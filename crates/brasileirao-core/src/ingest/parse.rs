// Per-file parsing into the loosely-typed `RawTable` and season tagging.
//
// Nothing here knows about metrics or targets: a season file is a header and
// a list of text cells. Typing happens in `coerce` after reconciliation.

use super::error::{LoadError, ParseError};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// One source row: column name -> text, plus the season it came from.
/// A column missing from the map is an absent cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub year: i32,
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(year: i32, cells: HashMap<String, String>) -> Self {
        RawRow { year, cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    fn rename(&mut self, from: &str, to: &str) {
        if let Some(value) = self.cells.remove(from) {
            self.cells.insert(to.to_string(), value);
        }
    }
}

/// A season file (or a union of season files) before reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        RawTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Rename a column in the header and in every row. No-op when `from` is
    /// not present.
    pub(crate) fn rename_column(&mut self, from: &str, to: &str) {
        let Some(pos) = self.columns.iter().position(|c| c == from) else {
            return;
        };
        self.columns[pos] = to.to_string();
        for row in &mut self.rows {
            row.rename(from, to);
        }
    }

    /// Append another table. Columns keep first-seen order; rows keep their
    /// own cells, so a column absent from `other` stays absent for its rows.
    pub(crate) fn append(&mut self, other: RawTable) {
        for column in other.columns {
            if !self.has_column(&column) {
                self.columns.push(column);
            }
        }
        self.rows.extend(other.rows);
    }
}

// ---------------------------------------------------------------------------
// Season year
// ---------------------------------------------------------------------------

/// Season year from the trailing `_`-separated token of the file stem:
/// `team_statistics_brasileirao_2015.csv` -> 2015.
pub fn season_year(path: &Path) -> Result<i32, LoadError> {
    let malformed = |reason: String| LoadError::MalformedFilename {
        path: path.to_path_buf(),
        reason,
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| malformed("file name is not valid UTF-8".into()))?;
    let token = stem.rsplit('_').next().unwrap_or(stem);

    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!(
            "expected a 4-digit year after the last `_`, found `{token}`"
        )));
    }
    token
        .parse::<i32>()
        .map_err(|e| malformed(format!("`{token}` is not a year: {e}")))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse CSV content into a `RawTable`, tagging every row with `year`.
///
/// The reader is strict: a row with the wrong number of fields or invalid
/// UTF-8 fails the whole file.
pub(crate) fn read_season_from_reader<R: Read>(rdr: R, year: i32) -> Result<RawTable, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(rdr);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::NoHeader);
    }
    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(ParseError::DuplicateColumn(header.clone()));
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(RawRow::new(year, cells));
    }

    Ok(RawTable::new(headers, rows))
}

/// Read one season file: derive its year from the name, then parse it.
pub fn read_season_file(path: &Path) -> Result<RawTable, LoadError> {
    let year = season_year(path)?;
    let failure = |source: ParseError| LoadError::FileParseFailure {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| failure(ParseError::Io(e)))?;
    read_season_from_reader(file, year).map_err(failure)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
