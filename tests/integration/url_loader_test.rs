//! `url()` targets under each asset loader

use super::fixtures::{module, record, Project, PNG};
use bundlegraph::core::css_resolver::asset_file_name;
use bundlegraph::models::{Loader, UrlRewrite};
use std::path::{Path, PathBuf};

fn png_project(loader: Option<Loader>) -> Project {
    let project = Project::new()
        .file("/entry.css", "a {\n\tbackground: url(./example.png);\n}")
        .file("/example.png", PNG)
        .entry("/entry.css")
        .out_dir("/out");
    match loader {
        Some(loader) => project.loader(".png", loader),
        None => project,
    }
}

#[test]
fn test_text_loader_inlines_contents() {
    let result = Project::new()
        .file("/entry.css", "a {\n\tbackground: url(./example.txt);\n}")
        .file("/example.txt", "This is some text.")
        .entry("/entry.css")
        .out_dir("/out")
        .loader(".txt", Loader::Text)
        .expect("", "");

    assert_eq!(
        record(&result.graph, "/entry.css", 0).url_rewrite,
        Some(UrlRewrite::InlineText("This is some text.".to_string()))
    );
    assert!(result.graph.assets().is_empty());
}

#[test]
fn test_dataurl_loader() {
    let result = png_project(Some(Loader::DataUrl)).expect("", "");

    assert_eq!(
        record(&result.graph, "/entry.css", 0).url_rewrite,
        Some(UrlRewrite::DataUrl("data:image/png;base64,iVBORw0KGgo=".to_string()))
    );
    let target = module(&result.graph, "/example.png");
    assert_eq!(target.loader, Loader::DataUrl);
    assert_eq!(target.contents.as_deref().map(Vec::as_slice), Some(PNG));
}

#[test]
fn test_base64_loader() {
    let result = png_project(Some(Loader::Base64)).expect("", "");

    assert_eq!(
        record(&result.graph, "/entry.css", 0).url_rewrite,
        Some(UrlRewrite::Base64("iVBORw0KGgo=".to_string()))
    );
    assert!(result.graph.assets().is_empty());
}

#[test]
fn test_file_and_binary_loaders_emit_assets() {
    let name = asset_file_name(Path::new("/example.png"), PNG);

    for loader in [Loader::File, Loader::Binary] {
        let result = png_project(Some(loader)).expect("", "");

        assert_eq!(
            record(&result.graph, "/entry.css", 0).url_rewrite,
            Some(UrlRewrite::OutputAsset(format!("./{}", name)))
        );
        let assets = result.graph.assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].source, PathBuf::from("/example.png"));
        assert_eq!(assets[0].output_path, PathBuf::from("/out").join(&name));
        assert_eq!(assets[0].loader, loader);
    }
}

#[test]
fn test_unknown_url_extension_defaults_to_file() {
    let result = png_project(None).expect("", "");

    assert_eq!(module(&result.graph, "/example.png").loader, Loader::File);
    assert_eq!(result.graph.assets().len(), 1);
}

#[test]
fn test_output_file_directory_receives_assets() {
    let name = asset_file_name(Path::new("/example.png"), PNG);
    let result = Project::new()
        .file("/entry.css", "a { background: url(./example.png) }")
        .file("/example.png", PNG)
        .entry("/entry.css")
        .out_file("/dist/out.css")
        .expect("", "");

    assert_eq!(result.graph.assets()[0].output_path, PathBuf::from("/dist").join(name));
}

#[test]
fn test_remote_and_data_urls_are_left_alone() {
    let (result, fs) = Project::new()
        .file(
            "/entry.css",
            "a { background: url(https://example.com/a.png) }\n\
             b { background: url(//cdn.example.com/b.png) }\n\
             c { background: url(data:image/png;base64,AAAA) }",
        )
        .entry("/entry.css")
        .out_dir("/out")
        .run();

    assert!(result.scan_log().is_empty());
    assert_eq!(result.graph.len(), 1);
    assert!(result.graph.edges().is_empty());
    assert_eq!(fs.total_reads(), 1);
}

#[test]
fn test_same_asset_twice_is_emitted_once() {
    let (result, fs) = Project::new()
        .file("/entry.css", "@import \"./other.css\";\na { background: url(./example.png) }")
        .file("/other.css", "b { background: url(./example.png) }")
        .file("/example.png", PNG)
        .entry("/entry.css")
        .out_dir("/out")
        .run();

    assert!(result.scan_log().is_empty());
    assert_eq!(result.graph.assets().len(), 1);
    assert_eq!(fs.read_count(Path::new("/example.png")), 1);
    assert_eq!(
        record(&result.graph, "/entry.css", 1).url_rewrite,
        record(&result.graph, "/other.css", 0).url_rewrite
    );
}

#[test]
fn test_asset_imported_from_js() {
    let result = png_project(Some(Loader::DataUrl))
        .file("/entry.js", "import logo from \"./example.png\";\nconsole.log(logo)")
        .entry("/entry.js")
        .expect("", "");

    let entry = module(&result.graph, "/entry.js");
    assert_eq!(entry.records.len(), 1);
    // Only url() tokens carry a rewrite
    assert_eq!(entry.records[0].url_rewrite, None);
    assert!(result.graph.contains(Path::new("/example.png")));
}
