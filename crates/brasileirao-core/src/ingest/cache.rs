// Load-once memoization, keyed by what is on disk.
//
// The pipeline itself keeps no hidden state. A host that wants repeated
// loads to be free passes a `TableCache` to `load_cached`; the key changes
// whenever a matching file is added, removed, resized or touched.

use super::{DataSource, LoadOutcome};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FileStamp {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> Self {
        let meta = std::fs::metadata(path).ok();
        FileStamp {
            path: path.to_path_buf(),
            len: meta.as_ref().map_or(0, |m| m.len()),
            modified: meta.and_then(|m| m.modified().ok()),
        }
    }
}

/// Identity of one load's inputs: directory, prefix, and the name, size and
/// modification time of every matched file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    dir: PathBuf,
    prefix: String,
    files: Vec<FileStamp>,
}

impl SourceFingerprint {
    pub fn new(source: &DataSource, files: &[PathBuf]) -> Self {
        let mut stamps: Vec<FileStamp> = files.iter().map(|p| FileStamp::of(p)).collect();
        stamps.sort_by(|a, b| a.path.cmp(&b.path));
        SourceFingerprint {
            dir: source.dir.clone(),
            prefix: source.prefix.clone(),
            files: stamps,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Memoization capability injected into `load_cached`.
pub trait TableCache {
    fn get(&self, key: &SourceFingerprint) -> Option<Arc<LoadOutcome>>;
    fn insert(&self, key: SourceFingerprint, outcome: Arc<LoadOutcome>);
}

/// In-process cache. Entries live until the process exits.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<SourceFingerprint, Arc<LoadOutcome>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TableCache for MemoryCache {
    fn get(&self, key: &SourceFingerprint) -> Option<Arc<LoadOutcome>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn insert(&self, key: SourceFingerprint, outcome: Arc<LoadOutcome>) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, outcome);
    }
}
