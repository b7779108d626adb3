//! Build pipeline: scan, then check bindings

use super::binding::BindingChecker;
use super::scanner::Scanner;
use crate::diagnostics::{DiagnosticsCollector, Log};
use crate::error::{BundleError, Result};
use crate::models::{BuildOptions, Graph, Phase};
use crate::parsers::{DefaultParser, SourceParser};
use crate::utils::{FileSystem, RealFileSystem, RelativeResolver, Resolver};
use serde::Serialize;
use std::sync::Arc;

/// Graph and both diagnostic logs of a build
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub graph: Graph,
    pub logs: DiagnosticsCollector,
}

impl BuildResult {
    pub fn scan_log(&self) -> &Log {
        &self.logs.scan
    }

    pub fn compile_log(&self) -> &Log {
        &self.logs.compile
    }

    pub fn has_errors(&self) -> bool {
        self.logs.has_errors()
    }

    /// The graph, refused if either phase reported an error
    ///
    /// The error names the first phase that failed.
    pub fn into_graph(self) -> Result<Graph> {
        for (phase, log) in [(Phase::Scan, &self.logs.scan), (Phase::Compile, &self.logs.compile)] {
            if log.has_errors() {
                return Err(BundleError::build_failed(phase, log.error_count()));
            }
        }
        Ok(self.graph)
    }
}

/// Configured build over a file system
pub struct Bundle {
    options: BuildOptions,
    fs: Arc<dyn FileSystem>,
    resolver: Option<Arc<dyn Resolver>>,
    parser: Arc<dyn SourceParser>,
}

impl Bundle {
    /// Create a build over the real file system
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            fs: Arc::new(RealFileSystem),
            resolver: None,
            parser: Arc::new(DefaultParser::new()),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn SourceParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Scanner over this build's collaborators
    pub fn scanner(&self) -> Result<Scanner> {
        let resolver = match &self.resolver {
            Some(resolver) => resolver.clone(),
            None => Arc::new(
                RelativeResolver::new(self.fs.clone()).with_external(self.options.external.clone()),
            ),
        };
        Scanner::new(self.options.clone(), self.fs.clone(), resolver, self.parser.clone())
    }

    /// Run both phases; the compile phase only runs on a clean scan
    pub fn run(&self) -> Result<BuildResult> {
        let scanner = self.scanner()?;
        Ok(Self::run_with(&scanner))
    }

    /// Run both phases on an existing scanner, reusing its memo
    pub fn run_with(scanner: &Scanner) -> BuildResult {
        let output = scanner.scan_entry_points();
        let mut logs = DiagnosticsCollector::new();
        logs.scan = output.scan_log;

        if !logs.scan.has_errors() {
            logs.compile = BindingChecker::new(scanner.validator()).check(&output.graph);
        }

        BuildResult {
            graph: output.graph,
            logs,
        }
    }

    /// Run the build and hand over the graph only if there were no errors
    pub fn build(&self) -> Result<Graph> {
        self.run()?.into_graph()
    }
}
