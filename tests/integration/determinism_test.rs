//! Parallel scans produce the same graph and logs as sequential ones

use super::fixtures::{module_paths, Project, PNG};
use bundlegraph::core::BuildResult;
use bundlegraph::models::Loader;
use std::path::Path;

/// A project wide enough to spread over several workers, with errors mixed in
fn wide_project() -> Project {
    let mut entry = String::new();
    let mut project = Project::new();

    for i in 0..24 {
        entry.push_str(&format!("import \"./feature{}.js\";\n", i));
        let mut feature = format!("import \"./feature{}.css\";\nimport \"./shared.js\";\n", i);
        if i % 5 == 0 {
            feature.push_str(&format!("import \"./missing{}.js\";\n", i));
        }
        project = project
            .file(&format!("/src/feature{}.js", i), feature)
            .file(
                &format!("/src/feature{}.css", i),
                format!(
                    "@import \"./shared.css\";\n.f{} {{ background: url(./icon{}.png) }}\n.g {{ background: url(./gone{}.png) }}",
                    i,
                    i % 3,
                    i % 4
                ),
            );
    }

    project
        .file("/src/index.js", entry)
        .file("/src/shared.js", "export const shared = 1;")
        .file("/src/shared.css", "@charset \"UTF-8\";\n.shared {}")
        .file("/src/icon0.png", PNG)
        .file("/src/icon1.png", b"icon one")
        .file("/src/icon2.png", b"icon two")
        .file("/src/gone0.png", b"not gone after all")
        .entry("/src/index.js")
        .out_dir("/out")
        .loader(".png", Loader::File)
}

fn snapshot(result: &BuildResult) -> String {
    serde_json::to_string(result).unwrap()
}

#[test]
fn test_parallel_matches_sequential() {
    let (sequential, _) = wide_project().sequential().run();
    let (parallel, _) = wide_project().threads(4).run();

    assert!(sequential.scan_log().has_errors());
    assert_eq!(sequential.scan_log().to_text(), parallel.scan_log().to_text());
    assert_eq!(module_paths(&sequential.graph), module_paths(&parallel.graph));
    assert_eq!(snapshot(&sequential), snapshot(&parallel));
}

#[test]
fn test_repeated_runs_are_identical() {
    let project = wide_project().threads(8);
    let first = snapshot(&project.run().0);
    for _ in 0..5 {
        assert_eq!(snapshot(&project.run().0), first);
    }
}

#[test]
fn test_every_file_is_read_at_most_once() {
    let project = wide_project().threads(8);
    let (result, fs) = project.run();

    for module in result.graph.modules() {
        assert!(fs.read_count(&module.path) <= 1, "{} read twice", module.path.display());
    }
    assert_eq!(fs.read_count(Path::new("/src/shared.css")), 1);
    assert_eq!(fs.read_count(Path::new("/src/icon0.png")), 1);
}

#[test]
fn test_rescan_reuses_memoized_work() {
    let project = wide_project();
    let fs = project.file_system();
    let scanner = project.bundle(fs.clone()).scanner().unwrap();

    let first = scanner.scan_entry_points();
    let reads = fs.total_reads();
    let second = scanner.scan_entry_points();

    assert_eq!(fs.total_reads(), reads);
    assert_eq!(first.scan_log.to_text(), second.scan_log.to_text());
    assert_eq!(
        serde_json::to_string(&first.graph).unwrap(),
        serde_json::to_string(&second.graph).unwrap()
    );
}

#[test]
fn test_entry_points_keep_their_order() {
    let result = Project::new()
        .file("/b.css", ".b {}")
        .file("/a.css", ".a {}")
        .file("/c.js", "import \"./a.css\";")
        .entry("/b.css")
        .entry("/c.js")
        .entry("/a.css")
        .out_dir("/out")
        .threads(4)
        .expect("", "");

    let entries: Vec<_> = result
        .graph
        .entry_points()
        .iter()
        .map(|id| result.graph.module(*id).path.display().to_string())
        .collect();
    assert_eq!(entries, vec!["/b.css", "/c.js", "/a.css"]);
    assert_eq!(module_paths(&result.graph), vec!["/b.css", "/c.js", "/a.css"]);
}

#[test]
fn test_errors_follow_discovery_order() {
    let (result, _) = wide_project().threads(4).run();
    let text = result.scan_log().to_text();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "/src/feature0.js: error: Could not resolve \"./missing0.js\"");
    assert!(lines.iter().all(|line| line.contains(": error: Could not resolve")));
    assert_eq!(lines[5], "/src/feature1.css: error: Could not resolve \"./gone1.png\"");
    let first_css = lines.iter().position(|line| line.contains(".css: error")).unwrap();
    let last_js = lines.iter().rposition(|line| line.contains(".js: error")).unwrap();
    assert!(last_js < first_css);
}
