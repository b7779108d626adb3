//! Build options and their partial, mergeable form

use super::loader::{Loader, LoaderConfig};
use crate::error::{BundleError, Result};
use crate::utils::paths::normalize;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Main build options
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Entry point paths
    pub entry_points: Vec<PathBuf>,

    /// Single output file (its directory is the output directory)
    pub output_file: Option<PathBuf>,

    /// Output directory
    pub output_dir: Option<PathBuf>,

    /// Write the bundle to stdout instead of a file
    pub write_to_stdout: bool,

    /// Paths, names and patterns that are never read or bundled
    pub external: ExternalModules,

    /// Extension to loader overrides
    pub loaders: BTreeMap<String, Loader>,

    /// Whether to scan modules on a worker pool
    pub parallel: bool,

    /// Worker count (defaults to the number of CPUs)
    pub threads: Option<usize>,

    /// Report format (text, json)
    pub output_format: OutputFormat,

    /// Where the report is written (stdout if not specified)
    pub report_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show the module listing and debug logging
    pub verbose: bool,

    /// Whether to suppress everything but diagnostics
    pub quiet: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            entry_points: Vec::new(),
            output_file: None,
            output_dir: None,
            write_to_stdout: false,
            external: ExternalModules::default(),
            loaders: BTreeMap::new(),
            parallel: true,
            threads: None,
            output_format: OutputFormat::Text,
            report_file: None,
            use_colors: true,
            verbose: false,
            quiet: false,
        }
    }
}

impl BuildOptions {
    /// Directory the output is written to, if one is configured
    pub fn output_directory(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Some(dir.clone());
        }
        self.output_file
            .as_ref()
            .map(|file| file.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/")))
    }

    /// True when split artifacts such as CSS imported from JS have somewhere to go
    pub fn has_output_path(&self) -> bool {
        self.output_file.is_some() || self.output_dir.is_some()
    }

    /// Extension table with the configured overrides merged in
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::with_overrides(&self.loaders)
    }

    /// Anchor relative entry points and output paths at `base`
    pub fn absolutize(&mut self, base: &Path) {
        let anchor = |path: &Path| normalize(&base.join(path));
        self.entry_points = self.entry_points.iter().map(|p| anchor(p)).collect();
        self.output_file = self.output_file.as_deref().map(anchor);
        self.output_dir = self.output_dir.as_deref().map(anchor);
    }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Targets excluded from bundling
///
/// A spec is an absolute path (`/src/external.png`), a glob over absolute
/// paths (`/vendor/**`), or a bare package name (`react`).
#[derive(Debug, Clone, Default)]
pub struct ExternalModules {
    paths: BTreeSet<PathBuf>,
    names: BTreeSet<String>,
    patterns: Vec<Pattern>,
}

impl ExternalModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration strings
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let mut external = Self::new();
        for spec in specs {
            external.add(spec.as_ref())?;
        }
        Ok(external)
    }

    /// Add one spec, classifying it as a path, glob or name
    pub fn add(&mut self, spec: &str) -> Result<()> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(BundleError::config_error("Empty external module specifier"));
        }

        if spec.contains(['*', '?', '[']) {
            self.patterns.push(Pattern::new(spec)?);
        } else if spec.starts_with('/') {
            self.paths.insert(PathBuf::from(spec));
        } else {
            self.names.insert(spec.to_string());
        }
        Ok(())
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// True if the resolved path must not be read or bundled
    pub fn is_external_path(&self, path: &Path) -> bool {
        self.paths.contains(path) || self.patterns.iter().any(|p| p.matches_path(path))
    }

    /// True if a bare specifier names an external package
    pub fn is_external_name(&self, specifier: &str) -> bool {
        if self.names.contains(specifier) {
            return true;
        }
        // `react/jsx-runtime` is external when `react` is
        specifier
            .split('/')
            .next()
            .is_some_and(|package| !package.starts_with('.') && self.names.contains(package))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty() && self.patterns.is_empty()
    }

    /// Configuration strings this set was built from
    pub fn specs(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .chain(self.names.iter().cloned())
            .chain(self.patterns.iter().map(|p| p.as_str().to_string()))
            .collect()
    }
}

/// Partial options for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialOptions {
    pub entry_points: Option<Vec<PathBuf>>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub write_to_stdout: Option<bool>,
    pub external: Option<Vec<String>>,
    pub loader: Option<BTreeMap<String, Loader>>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub report_file: Option<PathBuf>,
    pub use_colors: Option<bool>,
    pub verbose: Option<bool>,
    pub quiet: Option<bool>,
}

impl PartialOptions {
    /// Merge another PartialOptions into this one
    /// Fields from `other` take precedence over existing fields; loader
    /// tables are merged per extension
    pub fn merge_from(&mut self, other: PartialOptions) {
        if other.entry_points.is_some() {
            self.entry_points = other.entry_points;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.write_to_stdout.is_some() {
            self.write_to_stdout = other.write_to_stdout;
        }
        if other.external.is_some() {
            self.external = other.external;
        }
        if let Some(loader) = other.loader {
            self.loader.get_or_insert_with(BTreeMap::new).extend(loader);
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.threads.is_some() {
            self.threads = other.threads;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.report_file.is_some() {
            self.report_file = other.report_file;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
    }

    /// Convert partial options to full options
    /// Uses defaults for any fields that are None
    pub fn to_options(&self) -> Result<BuildOptions> {
        let mut options = BuildOptions::default();

        if let Some(entry_points) = &self.entry_points {
            options.entry_points = entry_points.clone();
        }
        if let Some(output_file) = &self.output_file {
            options.output_file = Some(output_file.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            options.output_dir = Some(output_dir.clone());
        }
        if let Some(write_to_stdout) = self.write_to_stdout {
            options.write_to_stdout = write_to_stdout;
        }
        if let Some(external) = &self.external {
            options.external = ExternalModules::from_specs(external)?;
        }
        if let Some(loader) = &self.loader {
            options.loaders = loader.clone();
        }
        if let Some(parallel) = self.parallel {
            options.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            options.threads = Some(threads);
        }
        if let Some(output_format) = self.output_format {
            options.output_format = output_format;
        }
        if let Some(report_file) = &self.report_file {
            options.report_file = Some(report_file.clone());
        }
        if let Some(use_colors) = self.use_colors {
            options.use_colors = use_colors;
        }
        if let Some(verbose) = self.verbose {
            options.verbose = verbose;
        }
        if let Some(quiet) = self.quiet {
            options.quiet = quiet;
        }

        Ok(options)
    }
}
