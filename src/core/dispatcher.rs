//! Loader classification of resolved paths

use crate::models::{Loader, LoaderConfig};
use std::path::Path;

/// Where a path was referenced from, which decides the fallback loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifyContext {
    /// Entry points, JS imports and CSS `@import`
    ImportTarget,
    /// CSS `url()`
    UrlTarget,
}

/// Maps paths onto loaders using one immutable extension table
#[derive(Debug, Clone, Default)]
pub struct LoaderDispatcher {
    config: LoaderConfig,
}

impl LoaderDispatcher {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loader for `path`; unknown or missing extensions use the context's fallback
    pub fn classify(&self, path: &Path, context: ClassifyContext) -> Loader {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.config.lookup(ext))
            .unwrap_or_else(|| self.fallback(context))
    }

    fn fallback(&self, context: ClassifyContext) -> Loader {
        match context {
            ClassifyContext::ImportTarget => self.config.import_fallback(),
            ClassifyContext::UrlTarget => self.config.url_fallback(),
        }
    }
}
