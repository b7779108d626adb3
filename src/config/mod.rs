//! Configuration management
//!
//! Options are merged from, lowest precedence first: a TOML file, the
//! `BUNDLEGRAPH_*` environment and the command line.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use crate::error::Result;
use crate::models::{BuildOptions, PartialOptions};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig};
pub use parser::{
    create_default_config, find_default_config, parse_config_content, parse_config_file,
    parse_loader_spec,
};
pub use settings::OptionsValidator;

/// Default prefix of configuration environment variables
pub const ENV_PREFIX: &str = "BUNDLEGRAPH";

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialOptions>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialOptions,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            partial: PartialOptions::default(),
        }
    }

    /// Merge options from a partial configuration
    pub fn merge(mut self, partial: PartialOptions) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge options from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        let partial = source.load()?;
        tracing::debug!(source = source.name(), "loaded configuration");
        Ok(self.merge(partial))
    }

    /// Try to load from a source, ignoring it if unavailable or broken
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => self.merge(partial),
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "ignoring configuration source");
                self
            }
        }
    }

    /// Add configuration from a file, which must exist
    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let partial = FileConfig::with_path(path).load()?;
        Ok(self.merge(partial))
    }

    /// Try to add configuration from the default config file
    pub fn try_add_default_config_file(self) -> Self {
        match parser::find_default_config() {
            Ok(Some(default_config)) => self.merge(default_config),
            _ => self,
        }
    }

    /// Partial options merged so far
    pub fn partial(&self) -> &PartialOptions {
        &self.partial
    }

    /// Build the final options with validation
    pub fn build(self) -> Result<BuildOptions> {
        let options = self.partial.to_options()?;
        OptionsValidator::validate(&options)?;
        Ok(options)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with proper precedence handling
pub fn load_config(cli_args: CliArgs) -> Result<BuildOptions> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<BuildOptions> {
    let mut builder = ConfigBuilder::new();

    builder = match &cli_args.config {
        Some(path) => builder.add_config_file(path)?,
        None => builder.try_add_default_config_file(),
    };

    builder = builder.try_load_from(&EnvConfig::new(env_prefix));
    builder = builder.load_from(&CliConfig::new(cli_args))?;

    builder.build()
}
