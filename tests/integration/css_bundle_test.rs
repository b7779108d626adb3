//! CSS bundling scenarios: `@import`, JS/CSS interplay and `url()` legality

use super::fixtures::{module, module_paths, record, Project, PNG};
use bundlegraph::models::{Loader, ModuleState, Resolution, UrlRewrite};
use std::path::Path;

#[test]
fn test_css_entry_point() {
    let result = Project::new()
        .file("/entry.css", "\nbody {\n\tbackground: white;\n\tcolor: black }\n")
        .entry("/entry.css")
        .out_file("/out.css")
        .expect("", "");

    assert_eq!(module_paths(&result.graph), vec!["/entry.css"]);
    let entry = module(&result.graph, "/entry.css");
    assert_eq!(entry.loader, Loader::Css);
    assert_eq!(entry.state, ModuleState::Scanned);
    assert!(entry.records.is_empty());
}

#[test]
fn test_css_at_import_missing() {
    Project::new()
        .file("/entry.css", "\n@import \"./missing.css\";\n")
        .entry("/entry.css")
        .out_file("/out.css")
        .expect("/entry.css: error: Could not resolve \"./missing.css\"\n", "");
}

#[test]
fn test_css_at_import_external() {
    let project = Project::new()
        .file(
            "/entry.css",
            "@import \"./internal.css\";\n\
             @import \"./external1.css\";\n\
             @import \"./external2.css\";\n\
             @import \"./charset1.css\";\n\
             @import \"./charset2.css\";\n",
        )
        .file("/internal.css", ".before { color: red }")
        .file("/charset1.css", "@charset \"UTF-8\";\n.middle { color: green }")
        .file("/charset2.css", "@charset \"UTF-8\";\n.after { color: blue }")
        .entry("/entry.css")
        .out_file("/out.css")
        .external(&["/external1.css", "/external2.css"]);

    let (result, fs) = project.run();
    assert!(result.scan_log().is_empty());
    assert!(result.compile_log().is_empty());

    let graph = &result.graph;
    assert_eq!(
        module_paths(graph),
        vec!["/entry.css", "/internal.css", "/external1.css", "/external2.css", "/charset1.css", "/charset2.css"]
    );

    for external in ["/external1.css", "/external2.css"] {
        let module = module(graph, external);
        assert!(module.external);
        assert!(module.contents.is_none());
        assert_eq!(fs.read_count(Path::new(external)), 0);
    }
    assert_eq!(record(graph, "/entry.css", 1).resolution, Resolution::External("./external1.css".into()));
    assert_eq!(record(graph, "/entry.css", 0).resolution, Resolution::Resolved("/internal.css".into()));

    assert_eq!(module(graph, "/charset1.css").charsets, vec!["UTF-8".to_string()]);
    assert_eq!(module(graph, "/charset2.css").charsets, vec!["UTF-8".to_string()]);

    // Externals stay out of the flattened order
    let entry = graph.entry_points()[0];
    let order: Vec<_> = graph
        .css_import_order(entry)
        .into_iter()
        .map(|id| graph.module(id).path.display().to_string())
        .collect();
    assert_eq!(order, vec!["/internal.css", "/charset1.css", "/charset2.css", "/entry.css"]);
}

#[test]
fn test_css_at_import_shared() {
    let project = Project::new()
        .file("/entry.css", "@import \"./a.css\";\n@import \"./b.css\";\n.entry { color: red }")
        .file("/a.css", "@import \"./shared.css\";\n.a { color: green }")
        .file("/b.css", "@import \"./shared.css\";\n.b { color: blue }")
        .file("/shared.css", ".shared { color: black }")
        .entry("/entry.css")
        .out_file("/out.css");

    let (result, fs) = project.run();
    assert!(result.scan_log().is_empty());

    let graph = &result.graph;
    assert_eq!(module_paths(graph), vec!["/entry.css", "/a.css", "/b.css", "/shared.css"]);
    assert_eq!(graph.edges().len(), 4);
    assert_eq!(fs.read_count(Path::new("/shared.css")), 1);

    let order: Vec<_> = graph
        .css_import_order(graph.entry_points()[0])
        .into_iter()
        .map(|id| graph.module(id).path.display().to_string())
        .collect();
    assert_eq!(order, vec!["/shared.css", "/a.css", "/b.css", "/entry.css"]);
}

#[test]
fn test_css_from_js_missing_import() {
    Project::new()
        .file("/entry.js", "import {missing} from \"./a.css\"\nconsole.log(missing)")
        .file("/a.css", ".a { color: red }")
        .entry("/entry.js")
        .out_dir("/out")
        .expect("", "/entry.js: error: No matching export for import \"missing\"\n");
}

#[test]
fn test_css_from_js_missing_star_import() {
    Project::new()
        .file("/entry.js", "import * as ns from \"./a.css\"\nconsole.log(ns.missing)")
        .file("/a.css", ".a { color: red }")
        .entry("/entry.js")
        .out_dir("/out")
        .expect("", "/entry.js: warning: No matching export for import \"missing\"\n");
}

#[test]
fn test_import_css_from_js() {
    let result = Project::new()
        .file("/entry.js", "import \"./a.js\"\nimport \"./b.js\"")
        .file("/a.js", "import \"./a.css\";\nconsole.log('a')")
        .file("/a.css", ".a { color: red }")
        .file("/b.js", "import \"./b.css\";\nconsole.log('b')")
        .file("/b.css", ".b { color: blue }")
        .entry("/entry.js")
        .out_dir("/out")
        .expect("", "");

    assert_eq!(
        module_paths(&result.graph),
        vec!["/entry.js", "/a.js", "/b.js", "/a.css", "/b.css"]
    );
    assert!(result.graph.modules().iter().all(|m| m.is_scanned()));
}

#[test]
fn test_import_css_from_js_write_to_stdout() {
    let result = Project::new()
        .file("/entry.js", "import \"./entry.css\"")
        .file("/entry.css", ".entry { color: red }")
        .entry("/entry.js")
        .stdout()
        .expect(
            "/entry.js: error: Cannot import \"/entry.css\" into a JavaScript file without an output path configured\n",
            "",
        );

    // Illegal edges never reach the graph
    assert!(!result.graph.contains(Path::new("/entry.css")));
    assert!(result.into_graph().is_err());
}

#[test]
fn test_import_js_from_css() {
    Project::new()
        .file("/entry.js", "export default 123")
        .file("/entry.css", "@import \"./entry.js\";")
        .entry("/entry.css")
        .out_dir("/out")
        .expect("/entry.css: error: Cannot import \"/entry.js\" into a CSS file\n", "");
}

#[test]
fn test_import_json_from_css() {
    Project::new()
        .file("/entry.json", "{}")
        .file("/entry.css", "@import \"./entry.json\";")
        .entry("/entry.css")
        .out_dir("/out")
        .expect("/entry.css: error: Cannot import \"/entry.json\" into a CSS file\n", "");
}

#[test]
fn test_missing_import_url_in_css() {
    Project::new()
        .file(
            "/src/entry.css",
            "a { background: url(./one.png); }\nb { background: url(\"./two.png\"); }",
        )
        .entry("/src/entry.css")
        .out_dir("/out")
        .expect(
            "/src/entry.css: error: Could not resolve \"./one.png\"\n\
             /src/entry.css: error: Could not resolve \"./two.png\"\n",
            "",
        );
}

#[test]
fn test_bare_css_references_are_relative() {
    let result = Project::new()
        .file(
            "/src/entry.css",
            "@import \"theme.css\";\na { background: url(image.png) }",
        )
        .file("/src/theme.css", "a { color: red }")
        .file("/src/image.png", PNG)
        .entry("/src/entry.css")
        .out_dir("/out")
        .expect("", "");

    let graph = &result.graph;
    assert_eq!(
        record(graph, "/src/entry.css", 0).resolution,
        Resolution::Resolved("/src/theme.css".into())
    );
    assert_eq!(
        record(graph, "/src/entry.css", 1).resolution,
        Resolution::Resolved("/src/image.png".into())
    );
    // Diagnostics and the record keep the written form
    assert_eq!(record(graph, "/src/entry.css", 1).specifier, "image.png");
}

#[test]
fn test_url_query_and_hash_survive_rewrite() {
    let result = Project::new()
        .file(
            "/src/entry.css",
            "@font-face { src: url(./f.woff?#iefix) }\na { background: url(./logo.png#frag) }\nb { background: url(./missing.png?v=1) }",
        )
        .file("/src/f.woff", "wOFF")
        .file("/src/logo.png", PNG)
        .entry("/src/entry.css")
        .out_dir("/out")
        .loader(".woff", Loader::File)
        .expect("/src/entry.css: error: Could not resolve \"./missing.png?v=1\"\n", "");

    let graph = &result.graph;
    match &record(graph, "/src/entry.css", 0).url_rewrite {
        Some(UrlRewrite::OutputAsset(url)) => assert!(url.starts_with("./f.") && url.ends_with(".woff?#iefix"), "{}", url),
        other => panic!("unexpected rewrite {:?}", other),
    }
    match &record(graph, "/src/entry.css", 1).url_rewrite {
        Some(UrlRewrite::OutputAsset(url)) => assert!(url.ends_with(".png#frag"), "{}", url),
        other => panic!("unexpected rewrite {:?}", other),
    }
    assert_eq!(graph.assets().len(), 2);
}

#[test]
fn test_external_import_url_in_css() {
    let project = Project::new()
        .file(
            "/src/entry.css",
            "div:after {\n\
             \tcontent: 'If this is recognized, the path should become \"../src/external.png\"';\n\
             \tbackground: url(./external.png);\n\
             }",
        )
        .entry("/src/entry.css")
        .out_dir("/out")
        .external(&["/src/external.png"]);

    let (result, fs) = project.run();
    assert!(result.scan_log().is_empty());

    let graph = &result.graph;
    let entry = module(graph, "/src/entry.css");
    // The quoted text is a string, not a url() token
    assert_eq!(entry.records.len(), 1);
    assert_eq!(
        entry.records[0].url_rewrite,
        Some(UrlRewrite::External("../src/external.png".to_string()))
    );
    assert!(module(graph, "/src/external.png").external);
    assert_eq!(fs.read_count(Path::new("/src/external.png")), 0);
}

#[test]
fn test_invalid_import_url_in_css() {
    let result = Project::new()
        .file(
            "/entry.css",
            "a {\n\
             \tbackground: url(./js.js);\n\
             \tbackground: url(\"./jsx.jsx\");\n\
             \tbackground: url(./ts.ts);\n\
             \tbackground: url('./tsx.tsx');\n\
             \tbackground: url(./json.json);\n\
             \tbackground: url(./css.css);\n\
             }",
        )
        .file("/js.js", "export default 123")
        .file("/jsx.jsx", "export default 123")
        .file("/ts.ts", "export default 123")
        .file("/tsx.tsx", "export default 123")
        .file("/json.json", "{ \"test\": true }")
        .file("/css.css", "a { color: red }")
        .entry("/entry.css")
        .out_dir("/out")
        .expect(
            "/entry.css: error: Cannot use \"/js.js\" as a URL\n\
             /entry.css: error: Cannot use \"/jsx.jsx\" as a URL\n\
             /entry.css: error: Cannot use \"/ts.ts\" as a URL\n\
             /entry.css: error: Cannot use \"/tsx.tsx\" as a URL\n\
             /entry.css: error: Cannot use \"/json.json\" as a URL\n\
             /entry.css: error: Cannot use \"/css.css\" as a URL\n",
            "",
        );

    assert_eq!(module_paths(&result.graph), vec!["/entry.css"]);
}

#[test]
fn test_css_imported_from_two_js_files_is_one_module() {
    let (result, fs) = Project::new()
        .file("/entry.js", "import \"./a.js\"\nimport \"./b.js\"")
        .file("/a.js", "import \"./shared.css\"")
        .file("/b.js", "import \"./shared.css\"")
        .file("/shared.css", ".shared {}")
        .entry("/entry.js")
        .out_dir("/out")
        .run();

    assert!(!result.has_errors());
    assert_eq!(module_paths(&result.graph), vec!["/entry.js", "/a.js", "/b.js", "/shared.css"]);
    assert_eq!(fs.read_count(Path::new("/shared.css")), 1);
}

#[test]
fn test_errors_in_sibling_edges_do_not_stop_the_scan() {
    let result = Project::new()
        .file(
            "/entry.css",
            "@import \"./missing.css\";\n@import \"./ok.css\";\n.a { background: url(./gone.png) }",
        )
        .file("/ok.css", "@import \"./also-missing.css\";")
        .entry("/entry.css")
        .out_dir("/out")
        .expect(
            "/entry.css: error: Could not resolve \"./missing.css\"\n\
             /entry.css: error: Could not resolve \"./gone.png\"\n\
             /ok.css: error: Could not resolve \"./also-missing.css\"\n",
            "",
        );

    assert!(module(&result.graph, "/ok.css").is_scanned());
}
