//! Command-line argument configuration source

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{parser, ConfigSource};
use crate::cli::args::{Args, ReportFormat};
use crate::error::Result;
use crate::models::{OutputFormat, PartialOptions};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub entry_points: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub write_to_stdout: bool,
    pub external: Vec<String>,
    /// `.ext=loader` overrides
    pub loader: Vec<String>,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub report_file: Option<PathBuf>,
    pub no_colors: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            entry_points: args.entry_points.clone(),
            output_file: args.outfile.clone(),
            output_dir: args.outdir.clone(),
            write_to_stdout: args.stdout,
            external: args.external.clone(),
            loader: args.loader.clone(),
            no_parallel: args.no_parallel,
            threads: args.threads,
            output_format: args.output.map(|format| match format {
                ReportFormat::Text => OutputFormat::Text,
                ReportFormat::Json => OutputFormat::Json,
            }),
            report_file: args.report_file.clone(),
            no_colors: args.no_colors,
            quiet: args.quiet,
            verbose: args.verbose,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialOptions> {
        let args = &self.args;
        let mut options = PartialOptions {
            output_file: args.output_file.clone(),
            output_dir: args.output_dir.clone(),
            threads: args.threads,
            output_format: args.output_format,
            report_file: args.report_file.clone(),
            ..Default::default()
        };

        if !args.entry_points.is_empty() {
            options.entry_points = Some(args.entry_points.clone());
        }

        if !args.external.is_empty() {
            options.external = Some(args.external.clone());
        }

        if !args.loader.is_empty() {
            let mut loaders = BTreeMap::new();
            for spec in &args.loader {
                let (ext, loader) = parser::parse_loader_spec(spec)?;
                loaders.insert(ext, loader);
            }
            options.loader = Some(loaders);
        }

        // Flags only ever move away from the defaults
        if args.write_to_stdout {
            options.write_to_stdout = Some(true);
        }
        if args.no_parallel {
            options.parallel = Some(false);
        }
        if args.no_colors {
            options.use_colors = Some(false);
        }
        if args.quiet {
            options.quiet = Some(true);
        }
        if args.verbose {
            options.verbose = Some(true);
        }

        Ok(options)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
