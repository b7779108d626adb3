//! Validation of fully merged build options

use std::path::Path;

use crate::error::{BundleError, Result};
use crate::models::BuildOptions;

/// Options validator for ensuring configuration is valid
pub struct OptionsValidator;

impl OptionsValidator {
    /// Validate options and return errors if invalid
    ///
    /// Entry points are not checked for existence; missing entries become
    /// scan diagnostics instead.
    pub fn validate(options: &BuildOptions) -> Result<()> {
        if options.entry_points.is_empty() {
            return Err(BundleError::config_error("At least one entry point is required"));
        }

        if let Some(entry) = options.entry_points.iter().find(|e| e.as_os_str().is_empty()) {
            return Err(BundleError::InvalidPath {
                path: entry.clone(),
            });
        }

        if options.write_to_stdout && options.output_file.is_some() {
            return Err(BundleError::config_error(
                "Cannot write to stdout and to an output file at the same time",
            ));
        }

        if options.threads == Some(0) {
            return Err(BundleError::config_error("Thread count must be at least 1"));
        }

        if options.quiet && options.verbose {
            return Err(BundleError::config_error("Cannot be both quiet and verbose"));
        }

        if let Some(path) = &options.report_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the report can be written next to existing files
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !parent.exists() {
            return Err(BundleError::InvalidPath {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent).map_err(BundleError::io_error)?;
        if metadata.permissions().readonly() {
            return Err(BundleError::permission_denied(parent));
        }

        Ok(())
    }
}
