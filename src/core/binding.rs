//! Compile-phase binding checks against the finished graph

use super::validator::{ImportValidator, Verdict};
use crate::diagnostics::{DiagnosticKind, Log};
use crate::models::{Graph, Phase};
use std::collections::HashSet;

/// Re-validates every edge and reports what only a complete graph can tell
///
/// CSS modules export nothing: named imports from CSS are errors and each
/// member read through a namespace import of CSS is a warning.
#[derive(Debug, Clone, Copy)]
pub struct BindingChecker {
    validator: ImportValidator,
}

impl BindingChecker {
    pub fn new(validator: ImportValidator) -> Self {
        Self { validator }
    }

    /// Produce the compile log of `graph`, in edge order
    pub fn check(&self, graph: &Graph) -> Log {
        let mut log = Log::new();

        for edge in graph.edges() {
            let source = graph.module(edge.source);
            let target = graph.module(edge.target);
            if target.external {
                continue;
            }
            let record = graph.record(edge);

            match self.validator.validate(source.loader, target.loader, record.syntax) {
                Verdict::Illegal(violation) if violation.phase() == Phase::Compile => {
                    log.extend(violation.diagnostics(&source.path, &target.path, record));
                }
                Verdict::Deferred => {
                    let Some(namespace) = &record.namespace else {
                        continue;
                    };
                    let mut reported = HashSet::new();
                    for usage in source.usages_of(namespace) {
                        if reported.insert(usage.member.as_str()) {
                            log.add(
                                DiagnosticKind::no_matching_export(&usage.member)
                                    .warning(&source.path)
                                    .at(usage.span),
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(diagnostics = log.len(), "binding check finished");
        log
    }
}
