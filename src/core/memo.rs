//! Read-once memoization shared by scanner workers
//!
//! Every key maps to a `OnceLock`; the first worker to reach a key runs the
//! computation and concurrent workers block until the value is set. Entries
//! outlive a single scan, so scanning again reads and parses nothing new.

use crate::diagnostics::DiagnosticKind;
use crate::models::Loader;
use crate::parsers::ParsedSource;
use dashmap::DashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Contents of a file, or why it could not be read
pub type ReadOutcome = std::result::Result<Arc<Vec<u8>>, DiagnosticKind>;

/// A file read and parsed by one loader
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Ready {
        contents: Arc<Vec<u8>>,
        parsed: Arc<ParsedSource>,
    },
    Failed(DiagnosticKind),
}

impl LoadOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadOutcome::Ready { .. })
    }
}

/// Run `init` for `key` at most once and return the stored value
fn once<K, V, F>(map: &DashMap<K, Arc<OnceLock<V>>>, key: K, init: F) -> V
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> V,
{
    // The map guard is released before `init` runs so workers never block each other's shards
    let cell = map
        .entry(key)
        .or_insert_with(|| Arc::new(OnceLock::new()))
        .clone();
    cell.get_or_init(init).clone()
}

/// Memo tables of one scanner
#[derive(Debug, Default)]
pub struct ScanMemo {
    reads: DashMap<PathBuf, Arc<OnceLock<ReadOutcome>>>,
    loads: DashMap<(PathBuf, Loader), Arc<OnceLock<LoadOutcome>>>,
    resolutions: DashMap<(String, PathBuf), Option<PathBuf>>,
    read_count: AtomicUsize,
    parse_count: AtomicUsize,
}

impl ScanMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path`, reading it through `read` the first time only
    pub fn read_with<F>(&self, path: &Path, read: F) -> ReadOutcome
    where
        F: FnOnce() -> ReadOutcome,
    {
        once(&self.reads, path.to_path_buf(), || {
            self.read_count.fetch_add(1, Ordering::Relaxed);
            read()
        })
    }

    /// Parse result of `path` under `loader`, computing it the first time only
    pub fn load_with<F>(&self, path: &Path, loader: Loader, load: F) -> LoadOutcome
    where
        F: FnOnce() -> LoadOutcome,
    {
        once(&self.loads, (path.to_path_buf(), loader), || {
            self.parse_count.fetch_add(1, Ordering::Relaxed);
            load()
        })
    }

    /// Resolution of `specifier` from `importer_dir`
    pub fn resolve_with<F>(&self, specifier: &str, importer_dir: &Path, resolve: F) -> Option<PathBuf>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let key = (specifier.to_string(), importer_dir.to_path_buf());
        if let Some(hit) = self.resolutions.get(&key) {
            return hit.clone();
        }
        let resolved = resolve();
        // A racing worker computed the same answer; the first insert wins
        self.resolutions.entry(key).or_insert(resolved).clone()
    }

    /// Number of distinct files read
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Number of distinct (path, loader) loads performed
    pub fn parse_count(&self) -> usize {
        self.parse_count.load(Ordering::Relaxed)
    }

    pub fn resolution_count(&self) -> usize {
        self.resolutions.len()
    }
}
