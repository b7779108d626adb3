//! Import graph construction: loader dispatch, validation, scanning and binding checks

pub mod binding;
pub mod bundle;
pub mod css_resolver;
pub mod dispatcher;
pub mod memo;
pub mod parallel;
pub mod scanner;
pub mod validator;

pub use binding::BindingChecker;
pub use bundle::{BuildResult, Bundle};
pub use css_resolver::CssUrlResolver;
pub use dispatcher::{ClassifyContext, LoaderDispatcher};
pub use memo::ScanMemo;
pub use parallel::WorkerPool;
pub use scanner::{ScanOutput, Scanner};
pub use validator::{ImportValidator, Verdict, Violation};
