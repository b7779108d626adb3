//! Builds against files on disk

use bundlegraph::core::Bundle;
use bundlegraph::models::{BuildOptions, Loader, Phase, UrlRewrite};
use bundlegraph::BundleError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_bundle_from_disk() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("styles")).unwrap();
    fs::write(root.join("index.js"), "import \"./styles/main.css\";\nimport { value } from \"./value\";").unwrap();
    fs::write(root.join("value.ts"), "export const value = 1;").unwrap();
    fs::write(root.join("styles/main.css"), "@import \"./reset.css\";\nbody { background: url(../logo.png) }").unwrap();
    fs::write(root.join("styles/reset.css"), "* { margin: 0 }").unwrap();
    fs::write(root.join("logo.png"), b"\x89PNG\r\n\x1a\n").unwrap();

    let options = BuildOptions {
        entry_points: vec![root.join("index.js")],
        output_dir: Some(root.join("dist")),
        ..Default::default()
    };
    let result = Bundle::new(options).run().unwrap();

    assert!(!result.has_errors(), "{}", result.scan_log().to_text());
    assert_eq!(result.graph.len(), 5);

    let value = result.graph.get(&root.join("value.ts")).unwrap();
    assert_eq!(value.loader, Loader::Ts);

    let main = result.graph.get(&root.join("styles/main.css")).unwrap();
    match &main.records[1].url_rewrite {
        Some(UrlRewrite::OutputAsset(url)) => assert!(url.starts_with("./logo.") && url.ends_with(".png")),
        other => panic!("unexpected rewrite {:?}", other),
    }
    assert!(result.graph.assets()[0].output_path.starts_with(root.join("dist")));
}

#[test]
fn test_missing_entry_on_disk() {
    let temp_dir = tempdir().unwrap();
    let entry = temp_dir.path().join("missing.css");

    let options = BuildOptions {
        entry_points: vec![entry.clone()],
        output_dir: Some(temp_dir.path().join("dist")),
        ..Default::default()
    };
    let result = Bundle::new(options.clone()).run().unwrap();
    assert_eq!(
        result.scan_log().to_text(),
        format!("{}: error: Could not resolve \"{}\"\n", entry.display(), entry.display())
    );

    match Bundle::new(options).build() {
        Err(BundleError::BuildFailed { phase, errors }) => {
            assert_eq!(phase, Phase::Scan);
            assert_eq!(errors, 1);
        }
        other => panic!("expected a failed scan, got {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn test_unreadable_directory_target() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("dir.css")).unwrap();
    fs::write(root.join("entry.css"), "@import \"./dir.css\";").unwrap();

    let options = BuildOptions {
        entry_points: vec![root.join("entry.css")],
        output_dir: Some(root.join("dist")),
        ..Default::default()
    };
    let result = Bundle::new(options).run().unwrap();

    assert!(result.has_errors());
    let text = result.scan_log().to_text();
    assert!(text.contains("dir.css"), "{}", text);
}
