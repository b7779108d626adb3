//! bundlegraph - import graph construction for a JavaScript/TypeScript and CSS bundler
//!
//! This library follows JavaScript imports, CSS `@import` rules and CSS
//! `url()` tokens from a set of entry points, classifies every referenced
//! file by loader, checks cross-language imports for legality and reports
//! diagnostics in a deterministic order.

pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{BuildResult, Bundle, ScanOutput, Scanner};
pub use diagnostics::{DiagnosticKind, DiagnosticsCollector, Log};
pub use error::{BundleError, ErrorSeverity, Result};
pub use models::{BuildOptions, Diagnostic, Graph, ImportSyntax, Loader, Module, ModuleId, Severity};
pub use utils::{FileSystem, MemoryFileSystem, RealFileSystem, Resolver};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
