//! Loader kinds and the extension table that maps files onto them

use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// How a file is loaded into the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Js,
    Jsx,
    Ts,
    Tsx,
    Json,
    Css,
    Text,
    Binary,
    Base64,
    DataUrl,
    File,
    /// Ignored: never read, never an asset
    None,
}

impl Loader {
    /// Every loader, in declaration order
    pub const ALL: [Loader; 12] = [
        Loader::Js,
        Loader::Jsx,
        Loader::Ts,
        Loader::Tsx,
        Loader::Json,
        Loader::Css,
        Loader::Text,
        Loader::Binary,
        Loader::Base64,
        Loader::DataUrl,
        Loader::File,
        Loader::None,
    ];

    /// Parsed loaders whose content may reference further files
    pub fn is_code(self) -> bool {
        matches!(
            self,
            Loader::Js | Loader::Jsx | Loader::Ts | Loader::Tsx | Loader::Json | Loader::Css
        )
    }

    /// Terminal loaders whose content is an opaque payload
    pub fn is_asset(self) -> bool {
        matches!(
            self,
            Loader::Text | Loader::Binary | Loader::Base64 | Loader::DataUrl | Loader::File
        )
    }

    /// JavaScript and TypeScript loaders
    pub fn is_js_family(self) -> bool {
        matches!(self, Loader::Js | Loader::Jsx | Loader::Ts | Loader::Tsx)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Loader::Js => "js",
            Loader::Jsx => "jsx",
            Loader::Ts => "ts",
            Loader::Tsx => "tsx",
            Loader::Json => "json",
            Loader::Css => "css",
            Loader::Text => "text",
            Loader::Binary => "binary",
            Loader::Base64 => "base64",
            Loader::DataUrl => "dataurl",
            Loader::File => "file",
            Loader::None => "none",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Loader {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Loader::ALL
            .into_iter()
            .find(|loader| loader.as_str() == name)
            .ok_or_else(|| BundleError::invalid_loader(s))
    }
}

/// Built-in extension table
const DEFAULT_EXTENSIONS: &[(&str, Loader)] = &[
    (".js", Loader::Js),
    (".mjs", Loader::Js),
    (".cjs", Loader::Js),
    (".jsx", Loader::Jsx),
    (".ts", Loader::Ts),
    (".mts", Loader::Ts),
    (".cts", Loader::Ts),
    (".tsx", Loader::Tsx),
    (".json", Loader::Json),
    (".css", Loader::Css),
    (".txt", Loader::Text),
];

/// Extension to loader mapping with user overrides merged in
///
/// Built once before a build starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    table: HashMap<String, Loader>,
    url_fallback: Loader,
    import_fallback: Loader,
}

impl LoaderConfig {
    /// Create the built-in table
    pub fn new() -> Self {
        Self {
            table: DEFAULT_EXTENSIONS
                .iter()
                .map(|(ext, loader)| (ext.to_string(), *loader))
                .collect(),
            url_fallback: Loader::File,
            import_fallback: Loader::Js,
        }
    }

    /// Create the built-in table with `overrides` taking precedence
    pub fn with_overrides(overrides: &BTreeMap<String, Loader>) -> Self {
        let mut config = Self::new();
        for (ext, loader) in overrides {
            config.table.insert(normalize_extension(ext), *loader);
        }
        config
    }

    /// Loader for unknown extensions referenced through `url()`
    pub fn with_url_fallback(mut self, loader: Loader) -> Self {
        self.url_fallback = loader;
        self
    }

    /// Loader for unknown extensions of entry points and imports
    pub fn with_import_fallback(mut self, loader: Loader) -> Self {
        self.import_fallback = loader;
        self
    }

    pub fn lookup(&self, extension: &str) -> Option<Loader> {
        self.table.get(&normalize_extension(extension)).copied()
    }

    pub fn url_fallback(&self) -> Loader {
        self.url_fallback
    }

    pub fn import_fallback(&self) -> Loader {
        self.import_fallback
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase with a single leading dot: `PNG` and `.png` both become `.png`
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}
