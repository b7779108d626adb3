//! `url()` rewriting for assets referenced from CSS

use crate::models::{BuildOptions, Loader, OutputAsset, UrlRewrite};
use crate::utils::paths::{relative_to, stem_and_extension};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// MIME types by lowercase extension
const MIME_TYPES: &[(&str, &str)] = &[
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("css", "text/css"),
    ("eot", "application/vnd.ms-fontobject"),
    ("gif", "image/gif"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("otf", "font/otf"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("ttf", "font/ttf"),
    ("txt", "text/plain"),
    ("wav", "audio/wav"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// MIME type of `path` by extension, `application/octet-stream` if unknown
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// First eight hex digits of the SHA-256 of `contents`, uppercase
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    digest[..4].iter().map(|b| format!("{:02X}", b)).collect()
}

/// `<stem>.<hash>.<ext>` name of an emitted asset
pub fn asset_file_name(path: &Path, contents: &[u8]) -> String {
    let (stem, extension) = stem_and_extension(path);
    let hash = content_hash(contents);
    match extension {
        Some(ext) => format!("{}.{}.{}", stem, hash, ext),
        None => format!("{}.{}", stem, hash),
    }
}

/// Turns `url()` targets into their output representation
#[derive(Debug, Clone, Default)]
pub struct CssUrlResolver {
    output_dir: Option<PathBuf>,
}

impl CssUrlResolver {
    pub fn new(options: &BuildOptions) -> Self {
        Self {
            output_dir: options.output_directory(),
        }
    }

    pub fn with_output_dir(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// Rewrite for an asset target, plus the asset to emit for `file`/`binary`
    ///
    /// Returns `None` for loaders that are not assets.
    pub fn rewrite_asset(
        &self,
        path: &Path,
        loader: Loader,
        contents: &[u8],
    ) -> Option<(UrlRewrite, Option<OutputAsset>)> {
        match loader {
            Loader::Text => Some((
                UrlRewrite::InlineText(String::from_utf8_lossy(contents).into_owned()),
                None,
            )),
            Loader::DataUrl => Some((
                UrlRewrite::DataUrl(format!(
                    "data:{};base64,{}",
                    mime_type(path),
                    STANDARD.encode(contents)
                )),
                None,
            )),
            Loader::Base64 => Some((UrlRewrite::Base64(STANDARD.encode(contents)), None)),
            Loader::File | Loader::Binary => {
                let name = asset_file_name(path, contents);
                let url = format!("./{}", name);
                let output_path = match &self.output_dir {
                    Some(dir) => dir.join(&name),
                    None => PathBuf::from(&name),
                };
                let asset = OutputAsset {
                    source: path.to_path_buf(),
                    loader,
                    output_path,
                    url: url.clone(),
                };
                Some((UrlRewrite::OutputAsset(url), Some(asset)))
            }
            _ => None,
        }
    }

    /// Rewrite for an external target: its path relative to the output directory
    ///
    /// Without an output directory the specifier is kept as written.
    pub fn rewrite_external(&self, path: &Path, specifier: &str) -> UrlRewrite {
        match &self.output_dir {
            Some(dir) => UrlRewrite::External(relative_to(path, dir)),
            None => UrlRewrite::External(specifier.to_string()),
        }
    }
}
