//! Command-line interface components

pub mod args;

pub use args::{Args, ReportFormat};
