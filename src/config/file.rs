//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{BundleError, Result};
use crate::models::PartialOptions;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".bundlegraph.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialOptions> {
        if !self.is_available() {
            return Err(BundleError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Variables read by [`EnvConfig`], without their prefix
const ENV_KEYS: &[&str] = &[
    "ENTRY_POINTS",
    "OUTFILE",
    "OUTDIR",
    "EXTERNAL",
    "LOADER",
    "PARALLEL",
    "THREADS",
    "OUTPUT_FORMAT",
    "USE_COLORS",
];

/// Environment variable configuration source
///
/// List values (`ENTRY_POINTS`, `EXTERNAL`, `LOADER`) are comma separated;
/// loader entries use the `.ext=loader` form of the command line.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.var(key)
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(BundleError::config_error(format!(
                    "Invalid boolean for {}_{}: {}",
                    self.prefix, key, other
                ))),
            })
            .transpose()
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialOptions> {
        let mut options = PartialOptions {
            entry_points: self
                .list("ENTRY_POINTS")
                .map(|entries| entries.into_iter().map(PathBuf::from).collect()),
            output_file: self.var("OUTFILE").map(PathBuf::from),
            output_dir: self.var("OUTDIR").map(PathBuf::from),
            external: self.list("EXTERNAL"),
            parallel: self.flag("PARALLEL")?,
            use_colors: self.flag("USE_COLORS")?,
            ..Default::default()
        };

        if let Some(specs) = self.list("LOADER") {
            let mut loaders = std::collections::BTreeMap::new();
            for spec in specs {
                let (ext, loader) = parser::parse_loader_spec(&spec)?;
                loaders.insert(ext, loader);
            }
            options.loader = Some(loaders);
        }

        if let Some(threads) = self.var("THREADS") {
            let threads = threads.trim().parse().map_err(|_| {
                BundleError::config_error(format!("Invalid thread count: {}", threads))
            })?;
            options.threads = Some(threads);
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            let format = format.parse().map_err(|_| BundleError::InvalidOutputFormat {
                format,
            })?;
            options.output_format = Some(format);
        }

        Ok(options)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
