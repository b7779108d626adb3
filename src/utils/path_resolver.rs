//! Module path resolution

use super::fs::FileSystem;
use super::paths::normalize;
use crate::models::ExternalModules;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maps a specifier seen in `importer_dir` to an absolute path
pub trait Resolver: Send + Sync {
    /// `None` when the specifier names nothing this build can load
    fn resolve(&self, specifier: &str, importer_dir: &Path) -> Option<PathBuf>;
}

/// Extensions probed for extensionless relative specifiers, in order
const PROBE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "css"];

/// Resolver for relative and absolute specifiers
///
/// Bare package specifiers are not looked up; they resolve only through the
/// external names handled by the scanner.
pub struct RelativeResolver {
    fs: Arc<dyn FileSystem>,
    external: ExternalModules,
    file_exists_cache: DashMap<PathBuf, bool>,
}

impl RelativeResolver {
    /// Create a new resolver over `fs`
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            external: ExternalModules::default(),
            file_exists_cache: DashMap::new(),
        }
    }

    /// Treat these paths as resolvable even though they are never read
    pub fn with_external(mut self, external: ExternalModules) -> Self {
        self.external = external;
        self
    }

    fn candidate(specifier: &str, importer_dir: &Path) -> Option<PathBuf> {
        if specifier.starts_with('/') {
            Some(normalize(Path::new(specifier)))
        } else if specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../") {
            Some(normalize(&importer_dir.join(specifier)))
        } else {
            None
        }
    }

    fn check_file_exists(&self, path: &Path) -> bool {
        if let Some(exists) = self.file_exists_cache.get(path) {
            return *exists;
        }
        let exists = self.fs.exists(path);
        self.file_exists_cache.insert(path.to_path_buf(), exists);
        exists
    }

    fn resolve_relative(&self, candidate: PathBuf) -> Option<PathBuf> {
        if self.external.is_external_path(&candidate) || self.check_file_exists(&candidate) {
            return Some(candidate);
        }

        // Only extensionless specifiers are probed
        if candidate.extension().is_some() {
            return None;
        }

        let with_extensions = PROBE_EXTENSIONS
            .iter()
            .map(|ext| candidate.with_extension(ext));
        let index_files = PROBE_EXTENSIONS
            .iter()
            .map(|ext| candidate.join(format!("index.{}", ext)));

        with_extensions
            .chain(index_files)
            .find(|path| self.check_file_exists(path))
    }
}

impl Resolver for RelativeResolver {
    fn resolve(&self, specifier: &str, importer_dir: &Path) -> Option<PathBuf> {
        let candidate = Self::candidate(specifier, importer_dir)?;
        self.resolve_relative(candidate)
    }
}
