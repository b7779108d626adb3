//! Shared fixtures: an in-memory project plus the options to build it with

use bundlegraph::core::{BuildResult, Bundle};
use bundlegraph::models::{BuildOptions, ExternalModules, Graph, ImportRecord, Loader, Module};
use bundlegraph::utils::MemoryFileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An in-memory project and the options to build it with
pub struct Project {
    files: Vec<(String, Vec<u8>)>,
    pub options: BuildOptions,
}

impl Project {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            options: BuildOptions::default(),
        }
    }

    pub fn file(mut self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.files.push((path.to_string(), contents.as_ref().to_vec()));
        self
    }

    pub fn entry(mut self, path: &str) -> Self {
        self.options.entry_points.push(PathBuf::from(path));
        self
    }

    pub fn out_file(mut self, path: &str) -> Self {
        self.options.output_file = Some(PathBuf::from(path));
        self
    }

    pub fn out_dir(mut self, path: &str) -> Self {
        self.options.output_dir = Some(PathBuf::from(path));
        self
    }

    pub fn stdout(mut self) -> Self {
        self.options.write_to_stdout = true;
        self
    }

    pub fn external(mut self, specs: &[&str]) -> Self {
        self.options.external = ExternalModules::from_specs(specs).unwrap();
        self
    }

    pub fn loader(mut self, extension: &str, loader: Loader) -> Self {
        self.options.loaders.insert(extension.to_string(), loader);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.options.threads = Some(threads);
        self
    }

    pub fn file_system(&self) -> Arc<MemoryFileSystem> {
        Arc::new(MemoryFileSystem::from_files(
            self.files.iter().map(|(path, contents)| (path.as_str(), contents.as_slice())),
        ))
    }

    pub fn bundle(&self, fs: Arc<MemoryFileSystem>) -> Bundle {
        Bundle::new(self.options.clone()).with_fs(fs)
    }

    /// Build and return the result together with the file system it read from
    pub fn run(&self) -> (BuildResult, Arc<MemoryFileSystem>) {
        let fs = self.file_system();
        let result = self.bundle(fs.clone()).run().unwrap();
        (result, fs)
    }

    /// Build and compare both logs with their expected text
    pub fn expect(&self, scan_log: &str, compile_log: &str) -> BuildResult {
        let (result, _) = self.run();
        assert_eq!(result.scan_log().to_text(), scan_log, "scan log");
        assert_eq!(result.compile_log().to_text(), compile_log, "compile log");
        result
    }
}

/// Paths of the graph's modules in discovery order
pub fn module_paths(graph: &Graph) -> Vec<String> {
    graph
        .modules()
        .iter()
        .map(|module| module.path.display().to_string())
        .collect()
}

pub fn module<'g>(graph: &'g Graph, path: &str) -> &'g Module {
    graph
        .get(Path::new(path))
        .unwrap_or_else(|| panic!("{} is not in the graph", path))
}

/// Record `index` of the module at `path`
pub fn record<'g>(graph: &'g Graph, path: &str, index: usize) -> &'g ImportRecord {
    &module(graph, path).records[index]
}

/// The eight PNG signature bytes
pub const PNG: &[u8] = b"\x89\x50\x4E\x47\x0D\x0A\x1A\x0A";
