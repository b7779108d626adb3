//! AST parser wrapper using OXC

use super::import_collector::ImportCollector;
use super::ParsedSource;
use crate::error::{BundleError, Result};
use crate::models::Loader;
use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::path::Path;

/// Thread-safe allocator pool for reuse across parses
pub struct AllocatorPool {
    allocators: Mutex<Vec<Allocator>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let mut allocators = Vec::with_capacity(size);
        for _ in 0..size {
            allocators.push(Allocator::default());
        }
        Self {
            allocators: Mutex::new(allocators),
        }
    }

    /// Take an allocator from the pool, or a fresh one if it is empty
    pub fn take(&self) -> Allocator {
        self.allocators.lock().pop().unwrap_or_default()
    }

    /// Reset an allocator and return it to the pool
    pub fn return_allocator(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }

    pub fn available(&self) -> usize {
        self.allocators.lock().len()
    }
}

/// AST parser using OXC
pub struct ASTParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl ASTParser {
    /// Create a new AST parser
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions {
                parse_regular_expression: true,
                ..ParseOptions::default()
            },
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }

    fn source_type(path: &Path, loader: Loader) -> SourceType {
        match loader {
            Loader::Ts => SourceType::ts(),
            Loader::Tsx => SourceType::tsx(),
            Loader::Jsx => SourceType::jsx(),
            _ => SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs()),
        }
    }

    /// Parse a JavaScript/TypeScript module and extract its records
    ///
    /// The AST is walked while the allocator is still borrowed; only owned
    /// data leaves this function.
    pub fn parse(&self, path: &Path, loader: Loader, source_text: &str) -> Result<ParsedSource> {
        let allocator = self.allocator_pool.take();

        let ret = Parser::new(&allocator, source_text, Self::source_type(path, loader))
            .with_options(self.parse_options.clone())
            .parse();

        let parsed = if ret.errors.is_empty() && !ret.panicked {
            Ok(ImportCollector::collect(&ret.program, source_text))
        } else {
            Err(BundleError::parse_error(path, describe_errors(&ret.errors)))
        };

        drop(ret);
        self.allocator_pool.return_allocator(allocator);
        parsed
    }
}

impl Default for ASTParser {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_errors(errors: &[OxcDiagnostic]) -> String {
    if errors.is_empty() {
        return "unrecoverable syntax error".to_string();
    }
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
