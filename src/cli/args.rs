//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// bundlegraph - build and validate the import graph of a JS/TS + CSS bundle
#[derive(Parser, Debug)]
#[command(name = "bundlegraph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and validate the import graph of a JavaScript/TypeScript and CSS bundle")]
#[command(long_about = "bundlegraph scans a set of entry points and follows every JavaScript import, \
CSS @import and CSS url() reference. Each referenced file is classified by loader, cross-language \
imports are checked for legality, and the resulting diagnostics are printed in a deterministic order.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Scan a CSS entry point
    bundlegraph src/index.css --outdir dist

    # Scan several entry points at once
    bundlegraph src/app.js src/admin.js --outdir dist

    # Bundle to stdout (no output directory for split artifacts)
    bundlegraph src/index.css --stdout

Loaders and Externals:
    # Inline PNG files as data URLs
    bundlegraph src/index.css --outdir dist --loader .png=dataurl

    # Leave a file or package out of the bundle
    bundlegraph src/app.js --outdir dist --external /src/vendor/logo.png --external react

Output Options:
    # JSON report with the module graph
    bundlegraph src/index.css --outdir dist --output json

    # Save the report to a file
    bundlegraph src/index.css --outdir dist --output json --report-file graph.json

Configuration:
    # Use a specific configuration file
    bundlegraph --config ./bundlegraph.toml

    # Create a default configuration file
    bundlegraph --init
")]
pub struct Args {
    /// Entry points of the build
    #[arg(value_name = "ENTRY", help = "Entry point files (CSS, JavaScript or TypeScript)")]
    pub entry_points: Vec<PathBuf>,

    /// Single output file
    #[arg(long, value_name = "FILE", help = "Output file; its directory is used for emitted assets")]
    pub outfile: Option<PathBuf>,

    /// Output directory
    #[arg(long, value_name = "DIR", help = "Output directory for the bundle and emitted assets")]
    pub outdir: Option<PathBuf>,

    /// Write the bundle to stdout
    #[arg(long, conflicts_with = "outfile", help = "Write the bundle to stdout instead of a file")]
    pub stdout: bool,

    /// External paths, globs and package names
    #[arg(long, value_name = "PATH|GLOB|NAME", help = "Leave a path, glob or package name out of the bundle (can be specified multiple times)")]
    pub external: Vec<String>,

    /// Loader overrides
    #[arg(long, value_name = ".EXT=LOADER", help = "Load files with this extension using the given loader, e.g. --loader .png=dataurl (can be specified multiple times)")]
    pub loader: Vec<String>,

    /// Disable parallel scanning
    #[arg(long, help = "Scan modules on the calling thread only")]
    pub no_parallel: bool,

    /// Worker threads
    #[arg(long, value_name = "N", help = "Number of scanner threads (defaults to the number of CPUs)")]
    pub threads: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum, help = "Report format: 'text' for diagnostics, 'json' for the full graph")]
    pub output: Option<ReportFormat>,

    /// Report file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write the report to (uses stdout if not specified)")]
    pub report_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Only print diagnostics
    #[arg(short, long, help = "Only print diagnostics, no summary")]
    pub quiet: bool,

    /// Show the module listing and debug logging
    #[arg(short, long, conflicts_with = "quiet", help = "List every module and enable debug logging")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .bundlegraph.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.bundlegraph.toml) in the current directory")]
    pub init: bool,
}

/// Report format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable diagnostics
    Text,
    /// JSON graph and diagnostics
    Json,
}
