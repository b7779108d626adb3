//! Lexical path helpers
//!
//! Build paths are absolute and may not exist on disk (in-memory builds), so
//! nothing here touches the file system.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the file system
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent = matches!(normalized.components().next_back(), Some(Component::ParentDir));
                // `..` at the root stays at the root
                if at_parent || (!normalized.pop() && !path.has_root()) {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `target` as seen from the directory `base`, with `/` separators
///
/// `relative_to("/src/external.png", "/out")` is `../src/external.png`.
pub fn relative_to(target: &Path, base: &Path) -> String {
    let target = normalize(target);
    let base = normalize(base);
    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[common..] {
        parts.push(part.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// File stem and extension (without the dot) of `path`
pub fn stem_and_extension(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, extension)
}
