//! Import records: one reference from a module to another resource

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Source location of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: u32,
    /// Byte offset one past the last character
    pub end: u32,
    /// 1-based line of `start`
    pub line: u32,
    /// 1-based column of `start`, counted in characters
    pub column: u32,
}

impl Span {
    /// Build a span for `start..end` and compute its line and column in `source`
    pub fn locate(source: &str, start: usize, end: usize) -> Self {
        let start = start.min(source.len());
        let end = end.min(source.len()).max(start);
        let prefix = source.get(..start).unwrap_or(source);
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = prefix[line_start..].chars().count() + 1;

        Self {
            start: start as u32,
            end: end as u32,
            line: line as u32,
            column: column as u32,
        }
    }
}

/// Syntactic form of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ImportSyntax {
    /// Binding-free import: `import "./a"`, `import("./a")`, `require("./a")`
    ImportStatement,
    /// Namespace import or re-export: `import * as ns from "./a"`, `export * from "./a"`
    StarImport,
    /// Named or default bindings: `import {x} from "./a"`, `import x from "./a"`
    NamedImport,
    /// CSS `@import`
    AtImport,
    /// CSS `url(...)`
    UrlToken,
}

impl ImportSyntax {
    pub const ALL: [ImportSyntax; 5] = [
        ImportSyntax::ImportStatement,
        ImportSyntax::StarImport,
        ImportSyntax::NamedImport,
        ImportSyntax::AtImport,
        ImportSyntax::UrlToken,
    ];

    /// True for the forms produced by CSS sources
    pub fn is_css(self) -> bool {
        matches!(self, ImportSyntax::AtImport | ImportSyntax::UrlToken)
    }
}

impl fmt::Display for ImportSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match self {
            ImportSyntax::ImportStatement => "import",
            ImportSyntax::StarImport => "import *",
            ImportSyntax::NamedImport => "import {}",
            ImportSyntax::AtImport => "@import",
            ImportSyntax::UrlToken => "url()",
        };
        f.write_str(form)
    }
}

/// Outcome of resolving a record's specifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved(PathBuf),
    /// Not bundled; carries the specifier to keep in the output
    External(String),
}

impl UrlRewrite {
    /// Re-attach a `?query`/`#hash` suffix to rewrites that are still URLs
    pub fn with_suffix(self, suffix: &str) -> Self {
        match self {
            UrlRewrite::OutputAsset(url) => UrlRewrite::OutputAsset(url + suffix),
            UrlRewrite::External(url) => UrlRewrite::External(url + suffix),
            other => other,
        }
    }
}

/// How a `url()` token is represented in the output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum UrlRewrite {
    /// Raw text payload of a `text` asset
    InlineText(String),
    /// Complete `data:` URL of a `dataurl` asset
    DataUrl(String),
    /// Base64 payload of a `base64` asset
    Base64(String),
    /// Path of an emitted `file`/`binary` asset, relative to the output directory
    OutputAsset(String),
    /// External target, relative to the output directory
    External(String),
}

/// One reference from a module to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    pub specifier: String,
    pub span: Span,
    pub syntax: ImportSyntax,
    /// Bindings requested by a `NamedImport`
    pub imported_names: Vec<String>,
    /// Local namespace name of a `StarImport`
    pub namespace: Option<String>,
    pub resolution: Resolution,
    pub url_rewrite: Option<UrlRewrite>,
}

impl ImportRecord {
    pub fn new(specifier: impl Into<String>, syntax: ImportSyntax, span: Span) -> Self {
        Self {
            specifier: specifier.into(),
            span,
            syntax,
            imported_names: Vec::new(),
            namespace: None,
            resolution: Resolution::Unresolved,
            url_rewrite: None,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.imported_names = names;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.resolution, Resolution::Unresolved)
    }

    pub fn is_external(&self) -> bool {
        matches!(self.resolution, Resolution::External(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_locate_first_line() {
        let span = Span::locate("@import \"a.css\";", 8, 15);
        assert_eq!((span.line, span.column), (1, 9));
        assert_eq!((span.start, span.end), (8, 15));
    }

    #[test]
    fn test_span_locate_later_line() {
        let source = "a {}\n  b { background: url(x.png) }\n";
        let start = source.find("url").unwrap();
        let span = Span::locate(source, start, start + 10);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 19);
    }

    #[test]
    fn test_span_locate_clamps_out_of_range() {
        let span = Span::locate("ab", 10, 4);
        assert_eq!(span.start, 2);
        assert_eq!(span.end, 2);

        let span = Span::locate("abc", 1, 40);
        assert_eq!((span.start, span.end), (1, 3));
    }

    #[test]
    fn test_record_builders() {
        let record = ImportRecord::new("./a.css", ImportSyntax::StarImport, Span::default())
            .with_namespace("ns");
        assert_eq!(record.namespace.as_deref(), Some("ns"));
        assert!(!record.is_resolved());

        let mut record = ImportRecord::new("./b.css", ImportSyntax::NamedImport, Span::default())
            .with_names(vec!["missing".to_string()]);
        record.resolution = Resolution::External("./b.css".to_string());
        assert!(record.is_resolved());
        assert!(record.is_external());
        assert_eq!(record.imported_names, vec!["missing"]);
    }
}
