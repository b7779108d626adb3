//! Data models and structures for bundlegraph

pub mod diagnostic;
pub mod graph;
pub mod import_record;
pub mod loader;
pub mod module;
pub mod options;

pub use diagnostic::{Diagnostic, Phase, Severity};
pub use graph::{Edge, Graph};
pub use import_record::{ImportRecord, ImportSyntax, Resolution, Span, UrlRewrite};
pub use loader::{Loader, LoaderConfig};
pub use module::{Module, ModuleId, ModuleState, NamespaceUsage, OutputAsset};
pub use options::{BuildOptions, ExternalModules, OutputFormat, PartialOptions};
