//! Modules: one discovered file of the build

use super::import_record::{ImportRecord, Span};
use super::loader::Loader;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Index of a module in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub(crate) u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scan progress of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ModuleState {
    Discovered,
    Parsing,
    RecordsExtracted,
    Scanned,
}

/// A member read through a namespace import, e.g. `ns.missing`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceUsage {
    pub namespace: String,
    pub member: String,
    pub span: Span,
}

/// An emitted `file`/`binary` asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputAsset {
    pub source: PathBuf,
    pub loader: Loader,
    /// Absolute output path when an output directory is configured, otherwise the bare file name
    pub output_path: PathBuf,
    /// Path written into the referencing `url()` token
    pub url: String,
}

/// One file of the build
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub id: ModuleId,
    pub path: PathBuf,
    pub loader: Loader,
    /// Raw bytes; `None` for external and ignored modules
    #[serde(skip)]
    pub contents: Option<Arc<Vec<u8>>>,
    pub external: bool,
    pub state: ModuleState,
    /// Records in source order
    pub records: Vec<ImportRecord>,
    /// `@charset` declarations of a CSS module
    pub charsets: Vec<String>,
    /// Namespace member reads of a JS module, in source order
    pub namespace_usages: Vec<NamespaceUsage>,
    /// Discovery sequence number
    pub sequence: usize,
}

impl Module {
    pub fn new(id: ModuleId, path: PathBuf, loader: Loader, external: bool, sequence: usize) -> Self {
        Self {
            id,
            path,
            loader,
            contents: None,
            external,
            state: ModuleState::Discovered,
            records: Vec::new(),
            charsets: Vec::new(),
            namespace_usages: Vec::new(),
            sequence,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_scanned(&self) -> bool {
        self.state == ModuleState::Scanned
    }

    /// Contents as UTF-8 text, if present and valid
    pub fn text(&self) -> Option<&str> {
        self.contents
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Members read through the namespace bound to `namespace`
    pub fn usages_of<'m>(&'m self, namespace: &'m str) -> impl Iterator<Item = &'m NamespaceUsage> + 'm {
        self.namespace_usages
            .iter()
            .filter(move |usage| usage.namespace == namespace)
    }
}
