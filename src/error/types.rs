//! Error types and definitions for bundlegraph
//!
//! These are the errors of the build itself (configuration, I/O, thread pool,
//! a graph refused because of diagnostics). Problems found *in the sources*
//! are not errors of this kind: they are recorded as diagnostics and surface
//! through the scan and compile logs.

use crate::models::Phase;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for bundlegraph operations
#[derive(Debug, Error)]
pub enum BundleError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be read
    #[error("Error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be parsed by its loader
    #[error("Error parsing {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
    },

    /// A phase produced error diagnostics, so the graph is withheld
    #[error("Build failed with {errors} {phase} error(s)")]
    BuildFailed {
        phase: Phase,
        errors: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied {
        path: PathBuf,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath {
        path: PathBuf,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Unknown loader name in configuration
    #[error("Invalid loader: {name}")]
    InvalidLoader {
        name: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
    },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat {
        format: String,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Worker pool construction error
    #[error("Thread pool error: {message}")]
    ThreadPool {
        message: String,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },
}

impl BundleError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            BundleError::PermissionDenied { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            BundleError::Config { .. } => ErrorSeverity::Critical,
            BundleError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            BundleError::ConfigRead { .. } => ErrorSeverity::Critical,
            BundleError::ConfigParse { .. } => ErrorSeverity::Critical,
            BundleError::InvalidLoader { .. } => ErrorSeverity::Critical,
            BundleError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            BundleError::StdoutWrite { .. } => ErrorSeverity::Critical,
            BundleError::ThreadPool { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BundleError::PermissionDenied { path, .. } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            BundleError::Io { source, .. } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            BundleError::InvalidPath { path, .. } => {
                format!("Invalid path: '{}'. Please provide a valid entry point path.", path.display())
            }
            BundleError::ConfigNotFound { path, .. } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            BundleError::InvalidLoader { name, .. } => {
                format!("Unknown loader '{}'. Expected one of: js, jsx, ts, tsx, json, css, text, binary, base64, dataurl, file, none.", name)
            }
            BundleError::BuildFailed { phase, errors } => {
                format!("The {} phase produced {} error(s). See the diagnostics above.", phase, errors)
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        BundleError::Io {
            source,
        }
    }

    /// Create a read error for a source file
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a source file
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BundleError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create the error returned when a graph with errors is requested
    pub fn build_failed(phase: Phase, errors: usize) -> Self {
        BundleError::BuildFailed { phase, errors }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        BundleError::Config {
            message: message.into(),
        }
    }

    /// Create an unknown loader error
    pub fn invalid_loader(name: impl Into<String>) -> Self {
        BundleError::InvalidLoader {
            name: name.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        BundleError::PermissionDenied {
            path: path.into(),
        }
    }

    /// Create a thread pool error
    pub fn thread_pool_error(message: impl Into<String>) -> Self {
        BundleError::ThreadPool {
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        BundleError::io_error(err)
    }
}

impl From<glob::PatternError> for BundleError {
    fn from(err: glob::PatternError) -> Self {
        BundleError::GlobPattern {
            source: err,
        }
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::JsonSerialize {
            source: err,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for BundleError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        BundleError::thread_pool_error(err.to_string())
    }
}

/// Result type alias for bundlegraph operations
pub type Result<T> = std::result::Result<T, BundleError>;
