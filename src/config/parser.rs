//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{BundleError, Result};
use crate::models::{ExternalModules, Loader, PartialOptions};

/// Parse a TOML configuration file into PartialOptions
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialOptions> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BundleError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| BundleError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialOptions
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialOptions> {
    let path = path.as_ref();

    let options: PartialOptions = toml::from_str(content).map_err(|e| BundleError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_options(&options, path)?;

    Ok(options)
}

/// Validate partial options for obvious errors
pub fn validate_partial_options<P: AsRef<Path>>(options: &PartialOptions, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |message: String| {
        BundleError::config_error(format!("{} in config file: {}", message, path.display()))
    };

    if let Some(entries) = &options.entry_points {
        if entries.iter().any(|entry| entry.as_os_str().is_empty()) {
            return Err(invalid("Empty entry point".to_string()));
        }
    }

    if let Some(external) = &options.external {
        ExternalModules::from_specs(external)
            .map_err(|e| invalid(format!("Invalid external module ({})", e)))?;
    }

    if let Some(loaders) = &options.loader {
        if let Some(ext) = loaders.keys().find(|ext| ext.trim().trim_start_matches('.').is_empty()) {
            return Err(invalid(format!("Invalid loader extension '{}'", ext)));
        }
    }

    if options.threads == Some(0) {
        return Err(invalid("Invalid threads 0. Must be at least 1".to_string()));
    }

    for (key, value) in [
        ("output_file", &options.output_file),
        ("output_dir", &options.output_dir),
        ("report_file", &options.report_file),
    ] {
        if value.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(invalid(format!("Invalid empty {}", key)));
        }
    }

    Ok(())
}

/// Parse a `.ext=loader` override as given on the command line
pub fn parse_loader_spec(spec: &str) -> Result<(String, Loader)> {
    let (ext, loader) = spec.split_once('=').ok_or_else(|| {
        BundleError::config_error(format!("Invalid loader override '{}', expected .ext=loader", spec))
    })?;
    let ext = ext.trim();
    if ext.trim_start_matches('.').is_empty() {
        return Err(BundleError::config_error(format!(
            "Invalid loader override '{}', missing extension",
            spec
        )));
    }
    Ok((ext.to_string(), loader.parse()?))
}

/// Find and load configuration from default locations
///
/// The working directory is searched first, then `$XDG_CONFIG_HOME/bundlegraph`.
pub fn find_default_config() -> Result<Option<PartialOptions>> {
    let current_dir_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if current_dir_config.is_file() {
        return Ok(Some(parse_config_file(current_dir_config)?));
    }

    if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        let xdg_config = config_dir.join("bundlegraph").join("config.toml");
        if xdg_config.is_file() {
            return Ok(Some(parse_config_file(xdg_config)?));
        }
    }

    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(BundleError::io_error)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).map_err(BundleError::io_error)?;

    Ok(())
}
