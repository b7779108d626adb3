//! Error handling for bundlegraph
//!
//! This module provides the error types and result alias used throughout
//! the crate.

pub mod types;

pub use types::{BundleError, ErrorSeverity, Result};
