use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use ansi_term::Colour::{Green, Red};
use bundlegraph::{
    cli::Args,
    config::{self, CliArgs, FileConfig},
    core::Bundle,
    error::{BundleError, ErrorSeverity, Result},
    models::BuildOptions,
    output::{create_formatter, create_writer},
    NAME, VERSION,
};

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let exit_code = match execute(args) {
        Ok(code) => code,
        Err(err) => report_error(&err),
    };

    process::exit(exit_code);
}

/// Route `tracing` events to stderr; `--verbose` enables debug events
fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    // A second initialisation (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print a user-facing error and pick the exit code from its severity
fn report_error(err: &BundleError) -> i32 {
    eprintln!("{}: {}", Red.bold().paint("error"), err.user_message());

    match err {
        BundleError::ConfigNotFound { .. } => {
            eprintln!("Suggestion: Create one with `{} --init` or pass --config", NAME);
        }
        BundleError::Config { .. } => {
            eprintln!("Suggestion: Run `{} --help` for the accepted options", NAME);
        }
        _ => {}
    }

    match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

/// Run the command and return the process exit code
fn execute(args: Args) -> Result<i32> {
    if args.init {
        return init_config();
    }

    let mut options = config::load_config(CliArgs::from(&args))?;
    options.absolutize(&std::env::current_dir()?);

    if options.verbose {
        print_options(&options);
    }

    let start_time = Instant::now();
    let result = Bundle::new(options.clone()).run()?;
    tracing::debug!(elapsed = ?start_time.elapsed(), modules = result.graph.len(), "build finished");

    let formatter = create_formatter(options.output_format, options.use_colors, options.verbose, options.quiet);
    let report = formatter.format(&result)?;
    create_writer(options.report_file.as_ref()).write(&report)?;

    if let Some(path) = &options.report_file {
        if !options.quiet {
            eprintln!("Report written to: {}", path.display());
        }
    }

    if result.has_errors() {
        return Ok(1);
    }

    if options.verbose {
        eprintln!("{} in {:.2?}", Green.paint("Build succeeded"), start_time.elapsed());
    }
    Ok(0)
}

fn init_config() -> Result<i32> {
    let config_path = PathBuf::from(config::file::DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        println!("Configuration file already exists at: {}", config_path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(0);
    }

    FileConfig::with_path(&config_path).create_default()?;
    println!("Created default configuration file at: {}", config_path.display());
    Ok(0)
}

fn print_options(options: &BuildOptions) {
    eprintln!("{} v{}", NAME, VERSION);
    for entry in &options.entry_points {
        eprintln!("  Entry point: {}", entry.display());
    }
    match options.output_directory() {
        Some(dir) => eprintln!("  Output directory: {}", dir.display()),
        None => eprintln!("  Output directory: none"),
    }
    if !options.external.is_empty() {
        eprintln!("  External: {}", options.external.specs().join(", "));
    }
    for (ext, loader) in &options.loaders {
        eprintln!("  Loader: {} = {}", ext, loader);
    }
    eprintln!("  Parallel scanning: {}", if options.parallel { "enabled" } else { "disabled" });
    eprintln!();
}
