//! Source parsing
//!
//! Every code loader has a parser that turns file contents into import
//! records. JavaScript and TypeScript go through OXC, CSS through a small
//! tokenizer, and JSON is only checked for validity since it references
//! nothing.

pub mod ast_parser;
pub mod css_parser;
pub mod import_collector;

pub use ast_parser::ASTParser;
pub use css_parser::parse_css;
pub use import_collector::ImportCollector;

use crate::error::{BundleError, Result};
use crate::models::{ImportRecord, Loader, NamespaceUsage};
use std::path::Path;

/// Everything a parser extracts from one module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    /// Records in source order
    pub records: Vec<ImportRecord>,
    /// `@charset` values (CSS only)
    pub charsets: Vec<String>,
    /// Member reads through namespace imports (JS only)
    pub namespace_usages: Vec<NamespaceUsage>,
}

/// Extracts import records from the text of a code module
pub trait SourceParser: Send + Sync {
    fn parse(&self, path: &Path, loader: Loader, source: &str) -> Result<ParsedSource>;
}

/// Parser dispatching on the loader
#[derive(Default)]
pub struct DefaultParser {
    js: ASTParser,
}

impl DefaultParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceParser for DefaultParser {
    fn parse(&self, path: &Path, loader: Loader, source: &str) -> Result<ParsedSource> {
        match loader {
            Loader::Css => Ok(parse_css(source)),
            Loader::Json => {
                serde_json::from_str::<serde_json::Value>(source)
                    .map_err(|e| BundleError::parse_error(path, e.to_string()))?;
                Ok(ParsedSource::default())
            }
            loader if loader.is_js_family() => self.js.parse(path, loader, source),
            _ => Ok(ParsedSource::default()),
        }
    }
}
