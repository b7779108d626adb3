//! Output formatting functionality
//!
//! Text output always starts with the diagnostic lines of both logs, in
//! their contract form, so the report stays comparable across runs.

use crate::core::BuildResult;
use crate::error::{BundleError, Result};
use crate::models::{Graph, Module, Resolution};
use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use serde::Serialize;

/// Diagnostics of both phases, scan log first
pub fn format_diagnostics_text(result: &BuildResult, use_colors: bool) -> String {
    let mut output = String::new();
    for log in [result.scan_log(), result.compile_log()] {
        if use_colors {
            output.push_str(&log.to_colored_text());
        } else {
            output.push_str(&log.to_text());
        }
    }
    output
}

/// Counts of the graph and the diagnostics
pub fn format_summary_text(result: &BuildResult, use_colors: bool) -> String {
    let mut output = String::new();
    let graph = &result.graph;

    if use_colors {
        output.push_str(&format!("{}\n\n", Blue.bold().paint("Build Summary")));
    } else {
        output.push_str("Build Summary\n\n");
    }

    let external = graph.modules().iter().filter(|m| m.external).count();
    output.push_str(&format!("Entry points: {}\n", graph.entry_points().len()));
    output.push_str(&format!("Modules: {} ({} external)\n", graph.len(), external));
    output.push_str(&format!("Edges: {}\n", graph.edges().len()));
    output.push_str(&format!("Emitted assets: {}\n", graph.assets().len()));
    if graph.has_cycles() {
        output.push_str("Import cycles: yes\n");
    }

    let errors = result.logs.error_count();
    let warnings = result.logs.warning_count();
    let errors_text = format!("Errors: {}", errors);
    let warnings_text = format!("Warnings: {}", warnings);

    if use_colors {
        let errors_text = if errors > 0 {
            Red.bold().paint(errors_text).to_string()
        } else {
            Green.paint(errors_text).to_string()
        };
        let warnings_text = if warnings > 0 {
            Yellow.paint(warnings_text).to_string()
        } else {
            warnings_text
        };
        output.push_str(&format!("{}\n{}\n", errors_text, warnings_text));
    } else {
        output.push_str(&format!("{}\n{}\n", errors_text, warnings_text));
    }

    output
}

/// One module with its outgoing references
pub fn format_module_text(graph: &Graph, module: &Module, use_colors: bool) -> String {
    let mut output = String::new();
    let path = module.path.display().to_string();

    let mut tags = vec![module.loader.to_string()];
    if module.external {
        tags.push("external".to_string());
    }
    if graph.entry_points().contains(&module.id) {
        tags.push("entry".to_string());
    }
    let tags = format!("[{}]", tags.join(", "));

    if use_colors {
        output.push_str(&format!("{} {}\n", Blue.bold().paint(path), Style::new().dimmed().paint(tags)));
    } else {
        output.push_str(&format!("{} {}\n", path, tags));
    }

    for charset in &module.charsets {
        output.push_str(&format!("  @charset \"{}\"\n", charset));
    }

    for record in &module.records {
        let target = match &record.resolution {
            Resolution::Resolved(path) => path.display().to_string(),
            Resolution::External(specifier) => format!("{} (external)", specifier),
            Resolution::Unresolved => "unresolved".to_string(),
        };
        output.push_str(&format!("  {} \"{}\" -> {}\n", record.syntax, record.specifier, target));
    }

    output
}

/// JSON report: the graph plus both logs
#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    errors: usize,
    warnings: usize,
    #[serde(flatten)]
    result: &'a BuildResult,
}

/// Format a build result as pretty-printed JSON
pub fn format_result_json(result: &BuildResult) -> Result<String> {
    let report = JsonReport {
        success: !result.has_errors(),
        errors: result.logs.error_count(),
        warnings: result.logs.warning_count(),
        result,
    };
    serde_json::to_string_pretty(&report).map_err(|source| BundleError::JsonSerialize { source })
}
