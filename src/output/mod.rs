//! Report formatting and writing

mod formatters;
mod writers;

pub use self::formatters::{
    format_diagnostics_text, format_module_text, format_result_json, format_summary_text,
};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::core::BuildResult;
use crate::error::Result;
use crate::models::OutputFormat;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a build result into a string
    fn format(&self, result: &BuildResult) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, result: &BuildResult) -> Result<String> {
        let mut output = formatters::format_diagnostics_text(result, self.use_colors);

        // Quiet mode prints the diagnostics only
        if self.quiet {
            return Ok(output);
        }

        if self.verbose {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("Modules:\n\n");
            for module in result.graph.modules() {
                output.push_str(&formatters::format_module_text(&result.graph, module, self.use_colors));
            }

            output.push_str("\nDependency order:\n");
            for id in result.graph.dependency_order() {
                output.push_str(&format!("  {}\n", result.graph.module(id).path.display()));
            }
        }

        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&formatters::format_summary_text(result, self.use_colors));

        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, result: &BuildResult) -> Result<String> {
        formatters::format_result_json(result)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
