//! Ordered diagnostic logs

use crate::models::{Diagnostic, Phase, Severity};
use ansi_term::Colour::{Red, Yellow};
use ansi_term::Style;
use serde::Serialize;
use std::collections::HashSet;

/// Diagnostics of one phase, in the order they were recorded
///
/// Recording the same diagnostic twice keeps the first occurrence only.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Log {
    entries: Vec<Diagnostic>,
    #[serde(skip)]
    seen: HashSet<Diagnostic>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic; returns false if an identical one was already recorded
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        if self.seen.contains(&diagnostic) {
            return false;
        }
        self.seen.insert(diagnostic.clone());
        self.entries.push(diagnostic);
        true
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add(diagnostic);
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|d| !d.is_error()).count()
    }

    /// One `<file>: <severity>: <message>` line per diagnostic
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|d| format!("{}\n", d))
            .collect()
    }

    /// Same lines as [`Log::to_text`] with the severity colored
    pub fn to_colored_text(&self) -> String {
        self.entries
            .iter()
            .map(|d| {
                let severity = match d.severity {
                    Severity::Error => Red.bold().paint("error"),
                    Severity::Warning => Yellow.bold().paint("warning"),
                };
                format!(
                    "{}: {}: {}\n",
                    Style::new().bold().paint(d.file.display().to_string()),
                    severity,
                    d.message
                )
            })
            .collect()
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Log {}

impl<'a> IntoIterator for &'a Log {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The two logs of a build: scan (graph construction) and compile (binding checks)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsCollector {
    pub scan: Log,
    pub compile: Log,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic in the log of its phase
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        match diagnostic.phase {
            Phase::Scan => self.scan.add(diagnostic),
            Phase::Compile => self.compile.add(diagnostic),
        }
    }

    pub fn scan_log(&self) -> &Log {
        &self.scan
    }

    pub fn compile_log(&self) -> &Log {
        &self.compile
    }

    pub fn has_errors(&self) -> bool {
        self.scan.has_errors() || self.compile.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.scan.error_count() + self.compile.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.scan.warning_count() + self.compile.warning_count()
    }
}
