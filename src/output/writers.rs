//! Writers for the report destinations

use crate::error::{BundleError, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Trait for output writers
pub trait OutputWriter {
    /// Write content to the output destination
    fn write(&self, content: &str) -> Result<()>;
}

/// Writer for stdout output
#[derive(Debug)]
pub struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| BundleError::StdoutWrite {
                source: e,
            })
    }
}

/// Writer for file output
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> Result<()> {
        let write_error = |e| BundleError::OutputWrite {
            path: self.path.clone(),
            source: e,
        };

        let mut file = File::create(&self.path).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)
    }
}

/// Create an output writer based on the report file option
pub fn create_writer(report_file: Option<impl AsRef<Path>>) -> Box<dyn OutputWriter> {
    match report_file {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(StdoutWriter),
    }
}
