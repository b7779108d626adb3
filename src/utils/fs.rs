//! File system access used by the scanner

use crate::error::{BundleError, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only view of the files a build may touch
pub trait FileSystem: Send + Sync {
    /// Read the full contents of a file
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// True if `path` names a readable file
    fn exists(&self, path: &Path) -> bool;
}

/// The operating system's file system
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => BundleError::permission_denied(path),
            _ => BundleError::read_error(path, e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory file system keyed by absolute path
///
/// Counts reads per path, which makes "each file is read once" observable.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, Arc<Vec<u8>>>,
    reads: DashMap<PathBuf, usize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(path, contents)` pairs
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: AsRef<[u8]>,
    {
        let mut fs = Self::new();
        for (path, contents) in files {
            fs.insert(path, contents);
        }
        fs
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) {
        self.files
            .insert(path.into(), Arc::new(contents.as_ref().to_vec()));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Number of times `path` has been read
    pub fn read_count(&self, path: &Path) -> usize {
        self.reads.get(path).map(|count| *count).unwrap_or(0)
    }

    /// Total number of reads across all paths
    pub fn total_reads(&self) -> usize {
        self.reads.iter().map(|entry| *entry.value()).sum()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        *self.reads.entry(path.to_path_buf()).or_insert(0) += 1;
        self.files
            .get(path)
            .map(|contents| contents.as_ref().clone())
            .ok_or_else(|| {
                BundleError::read_error(path, io::Error::new(io::ErrorKind::NotFound, "file not found"))
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
