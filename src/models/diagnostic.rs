//! Diagnostic records emitted while building and checking the graph

use super::import_record::Span;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Which pass raised a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Raised while building the graph
    Scan,
    /// Raised while checking bindings against the finished graph
    Compile,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Scan => write!(f, "scan"),
            Phase::Compile => write!(f, "compile"),
        }
    }
}

/// One error or warning attributed to a file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub severity: Severity,
    pub phase: Phase,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<PathBuf>,
        severity: Severity,
        phase: Phase,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
            severity,
            phase,
            message: message.into(),
        }
    }

    pub fn error(file: impl Into<PathBuf>, phase: Phase, message: impl Into<String>) -> Self {
        Self::new(file, Severity::Error, phase, message)
    }

    pub fn warning(file: impl Into<PathBuf>, phase: Phase, message: impl Into<String>) -> Self {
        Self::new(file, Severity::Warning, phase, message)
    }

    /// Attach the position of `span`
    pub fn at(mut self, span: Span) -> Self {
        self.line = Some(span.line);
        self.column = Some(span.column);
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `<file>: <severity>: <message>`; the position is kept for tooling only
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.file.display(), self.severity, self.message)
    }
}
