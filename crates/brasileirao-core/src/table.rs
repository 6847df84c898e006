// Canonical season table: the typed output of the ingestion pipeline.
//
// Everything downstream of reconciliation (analysis views, model training,
// export) reads these types. Nothing here is mutated after construction.

use crate::ingest::LoadError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Index, RangeInclusive};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TEAM_COLUMN: &str = "equipe";
pub const TARGET_COLUMN: &str = "colocacao_final";
/// Older seasons publish the final placement under this name.
pub const LEGACY_TARGET_COLUMN: &str = "ranking";
pub const YEAR_COLUMN: &str = "ano";

/// Turn a snake_case column name into a title-cased label:
/// `posse_de_bola` -> `Posse De Bola`.
pub fn display_name(column: &str) -> String {
    column
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A numeric cell that may be missing. `Absent` is never confused with zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    Number(f64),
    #[default]
    Absent,
}

impl Cell {
    /// Wrap a float, mapping NaN and infinities to `Absent`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Absent
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(v),
            Cell::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Cell::Absent)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Absent, Cell::from_f64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match (self, f.precision()) {
            (Cell::Number(v), Some(p)) => format!("{v:.p$}"),
            (Cell::Number(v), None) => v.to_string(),
            (Cell::Absent, _) => "-".to_string(),
        };
        // Right-aligned like a number unless asked otherwise.
        match (f.width(), f.align()) {
            (None, _) => f.write_str(&text),
            (Some(w), Some(fmt::Alignment::Left)) => write!(f, "{text:<w$}"),
            (Some(w), Some(fmt::Alignment::Center)) => write!(f, "{text:^w$}"),
            (Some(w), _) => write!(f, "{text:>w$}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The six per-season team statistics every canonical record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Gols,
    CartaoAmarelo,
    CartaoVermelho,
    PosseDeBola,
    PassesCertos,
    DisputaAerea,
}

impl Metric {
    pub const COUNT: usize = 6;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Gols,
        Metric::CartaoAmarelo,
        Metric::CartaoVermelho,
        Metric::PosseDeBola,
        Metric::PassesCertos,
        Metric::DisputaAerea,
    ];

    /// Source CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Gols => "gols",
            Metric::CartaoAmarelo => "cartao_amarelo",
            Metric::CartaoVermelho => "cartao_vermelho",
            Metric::PosseDeBola => "posse_de_bola",
            Metric::PassesCertos => "passes_certos",
            Metric::DisputaAerea => "disputa_aerea",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Metric::ALL.into_iter().find(|m| m.column() == name)
    }

    /// Position of this metric in `Metric::ALL` and in `MetricValues`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> String {
        display_name(self.column())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric `{0}`; expected one of gols, cartao_amarelo, cartao_vermelho, posse_de_bola, passes_certos, disputa_aerea")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_column(s).ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// One value per metric, indexed by `Metric`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValues([f64; Metric::COUNT]);

impl MetricValues {
    pub fn new(values: [f64; Metric::COUNT]) -> Self {
        MetricValues(values)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()]
    }

    /// Values in `Metric::ALL` order, ready to feed a model row.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<Metric> for MetricValues {
    type Output = f64;

    fn index(&self, metric: Metric) -> &f64 {
        &self.0[metric.index()]
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One team in one season, fully reconciled and coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub team: String,
    pub year: i32,
    pub metrics: MetricValues,
    /// Final league placement (1 = champion), stored under `TARGET_COLUMN`.
    pub final_position: f64,
}

// Serialized with the source column names so CSV/JSON exports line up with
// the input files.
impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("CanonicalRecord", 3 + Metric::COUNT)?;
        row.serialize_field(TEAM_COLUMN, &self.team)?;
        row.serialize_field(YEAR_COLUMN, &self.year)?;
        for (metric, value) in self.metrics.iter() {
            row.serialize_field(metric.column(), &value)?;
        }
        row.serialize_field(TARGET_COLUMN, &self.final_position)?;
        row.end()
    }
}

/// Contiguous span of seasons observed in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeasonRange {
    pub start: i32,
    pub end: i32,
}

impl SeasonRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: i32, end: i32) -> Option<Self> {
        (start <= end).then_some(SeasonRange { start, end })
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years().contains(&year)
    }
}

impl fmt::Display for SeasonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The analysis-ready table. Always non-empty, at most one row per
/// (team, year).
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    records: Vec<CanonicalRecord>,
    range: SeasonRange,
}

impl CanonicalTable {
    /// Validate and wrap a set of records.
    ///
    /// Fails with `EmptyResultAfterCleaning` for an empty set and with
    /// `DuplicateTeamSeason` (listing every offending pair) when a team
    /// appears twice in the same season.
    pub fn new(records: Vec<CanonicalRecord>) -> Result<Self, LoadError> {
        let (Some(start), Some(end)) = (
            records.iter().map(|r| r.year).min(),
            records.iter().map(|r| r.year).max(),
        ) else {
            return Err(LoadError::EmptyResultAfterCleaning);
        };

        let mut counts: BTreeMap<(&str, i32), usize> = BTreeMap::new();
        for record in &records {
            *counts.entry((record.team.as_str(), record.year)).or_default() += 1;
        }
        let duplicates: Vec<(String, i32)> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|((team, year), _)| (team.to_string(), year))
            .collect();
        if !duplicates.is_empty() {
            return Err(LoadError::DuplicateTeamSeason { duplicates });
        }

        Ok(CanonicalTable {
            records,
            range: SeasonRange { start, end },
        })
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn season_range(&self) -> SeasonRange {
        self.range
    }

    /// Sorted, de-duplicated team names.
    pub fn teams(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.team.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.records.iter().any(|r| r.team == team)
    }

    pub fn for_team<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a CanonicalRecord> + 'a {
        self.records.iter().filter(move |r| r.team == team)
    }

    /// Records ordered by (team, year), for order-insensitive comparison.
    pub fn sorted(&self) -> Vec<&CanonicalRecord> {
        let mut rows: Vec<&CanonicalRecord> = self.records.iter().collect();
        rows.sort_by(|a, b| a.team.cmp(&b.team).then(a.year.cmp(&b.year)));
        rows
    }

    /// Metric rows (in `Metric::ALL` order) and the matching placements.
    pub fn training_data(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        self.records
            .iter()
            .map(|r| (r.metrics.as_slice().to_vec(), r.final_position))
            .unzip()
    }
}

impl<'a> IntoIterator for &'a CanonicalTable {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
