//! The diagnostics a build can raise, and their message text
//!
//! Message strings are part of the output contract and are matched verbatim
//! by tooling, so they are built in one place.

use crate::models::{Diagnostic, Phase, Severity};
use std::fmt;
use std::path::{Path, PathBuf};

/// A problem found in the sources of a build
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// No file matches the specifier
    CouldNotResolve { specifier: String },
    /// The file exists but reading it failed
    CouldNotRead { path: PathBuf },
    /// The loader's parser rejected the file
    CouldNotParse { path: PathBuf, reason: String },
    /// `@import` of something other than CSS
    CannotImportIntoCss { path: PathBuf },
    /// `url()` of a code file
    CannotUseAsUrl { path: PathBuf },
    /// CSS syntax reached a JavaScript module
    CannotImportIntoJs { path: PathBuf },
    /// CSS imported from JS with nowhere to write the CSS output
    CssWithoutOutputPath { path: PathBuf },
    /// A binding CSS cannot provide
    NoMatchingExport { name: String },
}

impl DiagnosticKind {
    /// Pass that reports this kind
    pub fn phase(&self) -> Phase {
        match self {
            DiagnosticKind::NoMatchingExport { .. } => Phase::Compile,
            _ => Phase::Scan,
        }
    }

    pub fn error(&self, file: impl Into<PathBuf>) -> Diagnostic {
        Diagnostic::new(file, Severity::Error, self.phase(), self.to_string())
    }

    pub fn warning(&self, file: impl Into<PathBuf>) -> Diagnostic {
        Diagnostic::new(file, Severity::Warning, self.phase(), self.to_string())
    }

    pub fn could_not_resolve(specifier: impl Into<String>) -> Self {
        DiagnosticKind::CouldNotResolve {
            specifier: specifier.into(),
        }
    }

    pub fn no_matching_export(name: impl Into<String>) -> Self {
        DiagnosticKind::NoMatchingExport { name: name.into() }
    }
}

fn show(path: &Path) -> std::path::Display<'_> {
    path.display()
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::CouldNotResolve { specifier } => {
                write!(f, "Could not resolve \"{}\"", specifier)
            }
            DiagnosticKind::CouldNotRead { path } => {
                write!(f, "Could not read \"{}\"", show(path))
            }
            DiagnosticKind::CouldNotParse { path, reason } => {
                write!(f, "Could not parse \"{}\": {}", show(path), reason)
            }
            DiagnosticKind::CannotImportIntoCss { path } => {
                write!(f, "Cannot import \"{}\" into a CSS file", show(path))
            }
            DiagnosticKind::CannotUseAsUrl { path } => {
                write!(f, "Cannot use \"{}\" as a URL", show(path))
            }
            DiagnosticKind::CannotImportIntoJs { path } => {
                write!(f, "Cannot import \"{}\" into a JavaScript file", show(path))
            }
            DiagnosticKind::CssWithoutOutputPath { path } => write!(
                f,
                "Cannot import \"{}\" into a JavaScript file without an output path configured",
                show(path)
            ),
            DiagnosticKind::NoMatchingExport { name } => {
                write!(f, "No matching export for import \"{}\"", name)
            }
        }
    }
}
