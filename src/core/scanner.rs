//! Import graph construction
//!
//! The scan proceeds in waves. Every module of a wave is read, parsed and has
//! its records resolved, classified and validated on the worker pool; the
//! per-module results are then merged on the calling thread in discovery
//! order. Newly discovered modules get their sequence numbers during the
//! merge, so the graph and the scan log do not depend on thread timing.

use super::css_resolver::CssUrlResolver;
use super::dispatcher::{ClassifyContext, LoaderDispatcher};
use super::memo::{LoadOutcome, ReadOutcome, ScanMemo};
use super::parallel::WorkerPool;
use super::validator::{ImportValidator, Verdict};
use crate::diagnostics::{DiagnosticKind, Log};
use crate::error::{BundleError, Result};
use crate::models::{
    BuildOptions, Diagnostic, Graph, ImportRecord, ImportSyntax, Loader, ModuleId, ModuleState,
    NamespaceUsage, OutputAsset, Phase, Resolution, UrlRewrite,
};
use crate::parsers::css_parser::{is_remote_url, split_url_suffix};
use crate::parsers::{DefaultParser, ParsedSource, SourceParser};
use crate::utils::{FileSystem, RelativeResolver, Resolver};
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Graph and scan log produced by [`Scanner::scan`]
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub graph: Graph,
    pub scan_log: Log,
}

impl ScanOutput {
    pub fn has_errors(&self) -> bool {
        self.scan_log.has_errors()
    }

    /// The graph, refused if the scan reported any error
    pub fn into_graph(self) -> Result<Graph> {
        if self.scan_log.has_errors() {
            return Err(BundleError::build_failed(Phase::Scan, self.scan_log.error_count()));
        }
        Ok(self.graph)
    }
}

/// A module handed to a worker
struct Job {
    id: ModuleId,
    path: PathBuf,
    loader: Loader,
}

/// A validated reference from a scanned module to a target file
struct Link {
    record: usize,
    path: PathBuf,
    loader: Loader,
    external: bool,
    contents: Option<Arc<Vec<u8>>>,
    asset: Option<OutputAsset>,
}

impl Link {
    /// Only code modules are scanned; assets, ignored and external targets are terminal
    fn is_scannable(&self) -> bool {
        !self.external && self.loader.is_code()
    }
}

/// Everything a worker learned about one module
#[derive(Default)]
struct ModuleScan {
    contents: Option<Arc<Vec<u8>>>,
    records: Vec<ImportRecord>,
    charsets: Vec<String>,
    namespace_usages: Vec<NamespaceUsage>,
    links: Vec<Link>,
    diagnostics: Vec<Diagnostic>,
}

/// Builds module graphs from entry points
///
/// The memo lives as long as the scanner, so repeated scans of the same
/// entries read and parse nothing twice.
pub struct Scanner {
    options: BuildOptions,
    fs: Arc<dyn FileSystem>,
    resolver: Arc<dyn Resolver>,
    parser: Arc<dyn SourceParser>,
    dispatcher: LoaderDispatcher,
    validator: ImportValidator,
    urls: CssUrlResolver,
    memo: ScanMemo,
    pool: WorkerPool,
}

impl Scanner {
    /// Create a scanner over explicit collaborators
    pub fn new(
        options: BuildOptions,
        fs: Arc<dyn FileSystem>,
        resolver: Arc<dyn Resolver>,
        parser: Arc<dyn SourceParser>,
    ) -> Result<Self> {
        let pool = WorkerPool::new(options.parallel, options.threads)?;
        Ok(Self {
            dispatcher: LoaderDispatcher::new(options.loader_config()),
            validator: ImportValidator::new(&options),
            urls: CssUrlResolver::new(&options),
            memo: ScanMemo::new(),
            pool,
            options,
            fs,
            resolver,
            parser,
        })
    }

    /// Create a scanner with the relative resolver and the default parsers
    pub fn with_defaults(options: BuildOptions, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let resolver = RelativeResolver::new(fs.clone()).with_external(options.external.clone());
        Self::new(options, fs, Arc::new(resolver), Arc::new(DefaultParser::new()))
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn validator(&self) -> ImportValidator {
        self.validator
    }

    pub fn memo(&self) -> &ScanMemo {
        &self.memo
    }

    /// Scan the configured entry points
    pub fn scan_entry_points(&self) -> ScanOutput {
        let entries: Vec<String> = self
            .options
            .entry_points
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        self.scan(&entries)
    }

    /// Build the graph reachable from `entries`
    pub fn scan<S: AsRef<str>>(&self, entries: &[S]) -> ScanOutput {
        let mut graph = Graph::new();
        let mut log = Log::new();
        let mut wave = Vec::new();

        for entry in entries {
            let entry = entry.as_ref();
            let Some(path) = self.resolve(entry, Path::new("/")) else {
                tracing::debug!(entry, "could not resolve entry point");
                log.add(DiagnosticKind::could_not_resolve(entry).error(entry));
                continue;
            };

            let external = self.options.external.is_external_path(&path);
            let loader = self.dispatcher.classify(&path, ClassifyContext::ImportTarget);
            let (id, fresh) = graph.insert_module(path, loader, external);
            graph.add_entry_point(id);
            if fresh {
                if external || loader == Loader::None {
                    graph.module_mut(id).state = ModuleState::Scanned;
                } else {
                    wave.push(id);
                }
            }
        }

        let mut wave_number = 0;
        while !wave.is_empty() {
            tracing::debug!(wave = wave_number, modules = wave.len(), "scanning wave");
            let jobs: Vec<Job> = wave
                .iter()
                .map(|id| {
                    let module = graph.module_mut(*id);
                    module.state = ModuleState::Parsing;
                    Job {
                        id: *id,
                        path: module.path.clone(),
                        loader: module.loader,
                    }
                })
                .collect();

            let ids: Vec<ModuleId> = jobs.iter().map(|job| job.id).collect();
            let results = self.pool.map(jobs, |job| self.scan_module(&job));

            let mut next = Vec::new();
            for (id, result) in ids.into_iter().zip(results) {
                self.merge(&mut graph, &mut log, id, result, &mut next);
            }

            wave = next;
            wave_number += 1;
        }

        tracing::debug!(
            modules = graph.len(),
            edges = graph.edges().len(),
            errors = log.error_count(),
            "scan finished"
        );
        ScanOutput { graph, scan_log: log }
    }

    /// Fold one worker result into the graph, in record order
    fn merge(&self, graph: &mut Graph, log: &mut Log, id: ModuleId, scan: ModuleScan, next: &mut Vec<ModuleId>) {
        {
            let module = graph.module_mut(id);
            module.contents = scan.contents;
            module.records = scan.records;
            module.charsets = scan.charsets;
            module.namespace_usages = scan.namespace_usages;
            module.state = ModuleState::RecordsExtracted;
        }
        log.extend(scan.diagnostics);

        for link in scan.links {
            let scannable = link.is_scannable();
            let (target, fresh) = graph.insert_module(link.path, link.loader, link.external);
            if fresh {
                let module = graph.module_mut(target);
                if scannable {
                    next.push(target);
                } else {
                    module.contents = link.contents;
                    module.state = ModuleState::Scanned;
                }
            }
            graph.add_edge(id, link.record, target);
            if let Some(asset) = link.asset {
                graph.add_asset(asset);
            }
        }

        graph.module_mut(id).state = ModuleState::Scanned;
    }

    fn resolve(&self, specifier: &str, importer_dir: &Path) -> Option<PathBuf> {
        self.memo.resolve_with(specifier, importer_dir, || {
            self.resolver.resolve(specifier, importer_dir)
        })
    }

    fn read(&self, path: &Path) -> ReadOutcome {
        self.memo.read_with(path, || {
            self.fs.read(path).map(Arc::new).map_err(|e| {
                tracing::debug!(path = %path.display(), error = %e, "read failed");
                DiagnosticKind::CouldNotRead { path: path.to_path_buf() }
            })
        })
    }

    /// Read and parse `path` with `loader`, once per scanner
    fn load(&self, path: &Path, loader: Loader) -> LoadOutcome {
        self.memo.load_with(path, loader, || {
            let contents = match self.read(path) {
                Ok(contents) => contents,
                Err(kind) => return LoadOutcome::Failed(kind),
            };
            if !loader.is_code() {
                return LoadOutcome::Ready {
                    contents,
                    parsed: Arc::new(ParsedSource::default()),
                };
            }

            let parsed = std::str::from_utf8(&contents)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    self.parser
                        .parse(path, loader, text)
                        .map_err(|e| match e {
                            BundleError::Parse { message, .. } => message,
                            other => other.to_string(),
                        })
                });

            match parsed {
                Ok(parsed) => {
                    tracing::trace!(path = %path.display(), %loader, records = parsed.records.len(), "parsed module");
                    LoadOutcome::Ready {
                        contents,
                        parsed: Arc::new(parsed),
                    }
                }
                Err(reason) => LoadOutcome::Failed(DiagnosticKind::CouldNotParse {
                    path: path.to_path_buf(),
                    reason,
                }),
            }
        })
    }

    /// Worker side of a wave: load one module and link each of its records
    fn scan_module(&self, job: &Job) -> ModuleScan {
        let (contents, parsed) = match self.load(&job.path, job.loader) {
            LoadOutcome::Ready { contents, parsed } => (contents, parsed),
            LoadOutcome::Failed(kind) => {
                return ModuleScan {
                    diagnostics: vec![kind.error(&job.path)],
                    ..Default::default()
                };
            }
        };

        let mut scan = ModuleScan {
            contents: Some(contents),
            records: parsed.records.clone(),
            charsets: parsed.charsets.clone(),
            namespace_usages: parsed.namespace_usages.clone(),
            ..Default::default()
        };

        let importer_dir = job.path.parent().unwrap_or_else(|| Path::new("/"));
        for index in 0..scan.records.len() {
            if let Some(link) = self.link_record(job, importer_dir, index, &mut scan.records[index], &mut scan.diagnostics) {
                scan.links.push(link);
            }
        }
        scan
    }

    /// Resolve, classify and validate one record
    ///
    /// Returns the link to add to the graph, or `None` when the record yields no
    /// edge (bare external names, failures and illegal imports).
    fn link_record(
        &self,
        job: &Job,
        importer_dir: &Path,
        index: usize,
        record: &mut ImportRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Link> {
        let specifier = record.specifier.clone();
        let is_url = record.syntax == ImportSyntax::UrlToken;

        if self.options.external.is_external_name(&specifier) || is_remote_url(&specifier) {
            if is_url {
                record.url_rewrite = Some(UrlRewrite::External(specifier.clone()));
            }
            record.resolution = Resolution::External(specifier);
            return None;
        }

        let (target, suffix) = if is_url {
            split_url_suffix(&specifier)
        } else {
            (specifier.as_str(), "")
        };
        let Some(path) = self.resolve(&lookup_specifier(target, record.syntax), importer_dir) else {
            tracing::debug!(specifier = %specifier, importer = %job.path.display(), "could not resolve");
            diagnostics.push(DiagnosticKind::could_not_resolve(&specifier).error(&job.path).at(record.span));
            return None;
        };

        let context = if is_url {
            ClassifyContext::UrlTarget
        } else {
            ClassifyContext::ImportTarget
        };
        let loader = self.dispatcher.classify(&path, context);

        if self.options.external.is_external_path(&path) {
            if is_url {
                record.url_rewrite = Some(self.urls.rewrite_external(&path, target).with_suffix(suffix));
            }
            record.resolution = Resolution::External(specifier);
            return Some(Link {
                record: index,
                path,
                loader,
                external: true,
                contents: None,
                asset: None,
            });
        }

        record.resolution = Resolution::Resolved(path.clone());

        let verdict = self.validator.validate(job.loader, loader, record.syntax);
        if let Verdict::Illegal(violation) = verdict {
            if violation.phase() == Phase::Scan {
                diagnostics.extend(violation.diagnostics(&job.path, &path, record));
                return None;
            }
        }

        let mut link = Link {
            record: index,
            path,
            loader,
            external: false,
            contents: None,
            asset: None,
        };

        if loader.is_asset() {
            let contents = match self.read(&link.path) {
                Ok(contents) => contents,
                Err(kind) => {
                    diagnostics.push(kind.error(&job.path).at(record.span));
                    return None;
                }
            };
            if is_url {
                if let Some((rewrite, asset)) = self.urls.rewrite_asset(&link.path, loader, &contents) {
                    record.url_rewrite = Some(rewrite.with_suffix(suffix));
                    link.asset = asset;
                }
            }
            link.contents = Some(contents);
        }

        Some(link)
    }
}

/// Specifier handed to the resolver
///
/// Stylesheet references are always relative to the stylesheet, so a bare
/// `url(image.png)` or `@import "theme.css"` names a sibling file.
fn lookup_specifier(specifier: &str, syntax: ImportSyntax) -> Cow<'_, str> {
    let anchored = specifier.starts_with('/')
        || specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../");
    if syntax.is_css() && !anchored {
        Cow::Owned(format!("./{}", specifier))
    } else {
        Cow::Borrowed(specifier)
    }
}
