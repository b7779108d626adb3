//! Diagnostics collected while scanning and compiling

pub mod kind;
pub mod log;

pub use kind::DiagnosticKind;
pub use log::{DiagnosticsCollector, Log};
