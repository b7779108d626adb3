//! File system, path and resolution utilities

pub mod fs;
pub mod path_resolver;
pub mod paths;

pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use path_resolver::{RelativeResolver, Resolver};
