//! Cross-kind import legality
//!
//! Decides, for a (source loader, target loader, syntax) triple, whether an
//! import may become an edge of the graph. The match is exhaustive so every
//! triple has a verdict.

use crate::diagnostics::DiagnosticKind;
use crate::models::{BuildOptions, Diagnostic, ImportRecord, ImportSyntax, Loader, Phase};
use std::path::Path;

/// Why an import is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// `@import` of anything but CSS
    CssImportOfNonCss,
    /// `url()` of a code file
    UrlOfCodeLoader,
    /// CSS imported from JS while no output file or directory is configured
    CssFromJsWithoutOutputPath,
    /// Named bindings from CSS, which exports nothing
    NamedImportOfCss,
    /// `@import`/`url()` syntax in a JavaScript module
    CssSyntaxInJavaScript,
}

impl Violation {
    /// Pass that reports this violation
    ///
    /// Compile-phase violations keep their edge; the binding check reports them.
    pub fn phase(self) -> Phase {
        match self {
            Violation::NamedImportOfCss => Phase::Compile,
            _ => Phase::Scan,
        }
    }

    /// Diagnostics attributed to `importer` for `record` targeting `target`
    pub fn diagnostics(self, importer: &Path, target: &Path, record: &ImportRecord) -> Vec<Diagnostic> {
        let path = target.to_path_buf();
        let kinds = match self {
            Violation::CssImportOfNonCss => vec![DiagnosticKind::CannotImportIntoCss { path }],
            Violation::UrlOfCodeLoader => vec![DiagnosticKind::CannotUseAsUrl { path }],
            Violation::CssFromJsWithoutOutputPath => vec![DiagnosticKind::CssWithoutOutputPath { path }],
            Violation::CssSyntaxInJavaScript => vec![DiagnosticKind::CannotImportIntoJs { path }],
            Violation::NamedImportOfCss => record
                .imported_names
                .iter()
                .map(DiagnosticKind::no_matching_export)
                .collect(),
        };

        kinds
            .iter()
            .map(|kind| kind.error(importer).at(record.span))
            .collect()
    }
}

/// Outcome of validating one import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Legal,
    /// Legal now; member accesses are checked in the compile phase
    Deferred,
    Illegal(Violation),
}

impl Verdict {
    /// True if the import becomes an edge of the graph
    pub fn keeps_edge(self) -> bool {
        match self {
            Verdict::Legal | Verdict::Deferred => true,
            Verdict::Illegal(violation) => violation.phase() == Phase::Compile,
        }
    }
}

/// Table-driven legality check
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportValidator {
    has_output_path: bool,
}

impl ImportValidator {
    pub fn new(options: &BuildOptions) -> Self {
        Self {
            has_output_path: options.has_output_path(),
        }
    }

    pub fn with_output_path(has_output_path: bool) -> Self {
        Self { has_output_path }
    }

    /// Verdict for an import of a `target` file from a `source` file
    pub fn validate(&self, source: Loader, target: Loader, syntax: ImportSyntax) -> Verdict {
        use ImportSyntax::*;
        use Loader::*;

        match (source, target, syntax) {
            // CSS sources
            (Css, Loader::None, UrlToken) => Verdict::Legal,
            (Css, Loader::None, _) => Verdict::Illegal(Violation::CssImportOfNonCss),
            (Css, Css, UrlToken) => Verdict::Illegal(Violation::UrlOfCodeLoader),
            (Css, Css, _) => Verdict::Legal,
            (Css, Js | Jsx | Ts | Tsx | Json, UrlToken) => Verdict::Illegal(Violation::UrlOfCodeLoader),
            (Css, Js | Jsx | Ts | Tsx | Json, _) => Verdict::Illegal(Violation::CssImportOfNonCss),
            (Css, Text | Binary | Base64 | DataUrl | File, UrlToken) => Verdict::Legal,
            (Css, Text | Binary | Base64 | DataUrl | File, _) => {
                Verdict::Illegal(Violation::CssImportOfNonCss)
            }

            // JavaScript sources
            (Js | Jsx | Ts | Tsx, _, AtImport | UrlToken) => {
                Verdict::Illegal(Violation::CssSyntaxInJavaScript)
            }
            (Js | Jsx | Ts | Tsx, Css, _) if !self.has_output_path => {
                Verdict::Illegal(Violation::CssFromJsWithoutOutputPath)
            }
            (Js | Jsx | Ts | Tsx, Css, ImportStatement) => Verdict::Legal,
            (Js | Jsx | Ts | Tsx, Css, NamedImport) => Verdict::Illegal(Violation::NamedImportOfCss),
            (Js | Jsx | Ts | Tsx, Css, StarImport) => Verdict::Deferred,
            (Js | Jsx | Ts | Tsx, _, ImportStatement | StarImport | NamedImport) => Verdict::Legal,

            // JSON and assets reference nothing
            (Json | Text | Binary | Base64 | DataUrl | File | Loader::None, _, _) => Verdict::Legal,
        }
    }
}
