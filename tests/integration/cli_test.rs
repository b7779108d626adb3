use bundlegraph::cli::{Args, ReportFormat};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    for (name, contents) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    (temp_dir, root)
}

/// Run the binary in `dir` with no configuration leaking in from the environment
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bundlegraph"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("BUNDLEGRAPH_ENTRY_POINTS")
        .env_remove("BUNDLEGRAPH_OUTDIR")
        .env_remove("BUNDLEGRAPH_OUTFILE")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_args_parsing() {
    let args = Args::parse_from(["bundlegraph", "src/index.css"]);
    assert_eq!(args.entry_points, vec![PathBuf::from("src/index.css")]);
    assert_eq!(args.outdir, None);
    assert!(args.external.is_empty());
    assert!(args.output.is_none());
    assert!(!args.no_parallel);
    assert!(!args.quiet);

    let args = Args::parse_from([
        "bundlegraph",
        "a.js",
        "b.css",
        "--outdir", "dist",
        "--external", "react",
        "--external", "/vendor/*.css",
        "--loader", ".png=dataurl",
        "--threads", "2",
        "--output", "json",
        "--no-colors",
        "-q",
    ]);
    assert_eq!(args.entry_points.len(), 2);
    assert_eq!(args.outdir, Some(PathBuf::from("dist")));
    assert_eq!(args.external, vec!["react".to_string(), "/vendor/*.css".to_string()]);
    assert_eq!(args.loader, vec![".png=dataurl".to_string()]);
    assert_eq!(args.threads, Some(2));
    assert!(matches!(args.output, Some(ReportFormat::Json)));
    assert!(args.no_colors);
    assert!(args.quiet);
}

#[test]
fn test_cli_conflicting_flags() {
    assert!(Args::try_parse_from(["bundlegraph", "a.js", "--stdout", "--outfile", "out.js"]).is_err());
    assert!(Args::try_parse_from(["bundlegraph", "a.js", "-q", "-v"]).is_err());
    assert!(Args::try_parse_from(["bundlegraph", "a.js", "--output", "csv"]).is_err());
}

#[test]
fn test_cli_clean_build_exits_zero() {
    let (_guard, root) = project(&[
        ("src/index.css", "@import \"./reset.css\";\nbody { color: black }"),
        ("src/reset.css", "* { margin: 0 }"),
    ]);

    let output = run(&root, &["src/index.css", "--outdir", "dist", "--no-colors"]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Build Summary"));
    assert!(text.contains("Errors: 0"));
}

#[test]
fn test_cli_reports_diagnostics_and_exits_one() {
    let (_guard, root) = project(&[("entry.css", "@import \"./missing.css\";\n")]);

    let output = run(&root, &["entry.css", "--outdir", "dist", "--no-colors", "-q"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        format!("{}: error: Could not resolve \"./missing.css\"\n", root.join("entry.css").display())
    );
}

#[test]
fn test_cli_stdout_mode_rejects_css_from_js() {
    let (_guard, root) = project(&[("entry.js", "import \"./entry.css\""), ("entry.css", ".a {}")]);

    let output = run(&root, &["entry.js", "--stdout", "--no-colors", "-q"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        format!(
            "{}: error: Cannot import \"{}\" into a JavaScript file without an output path configured\n",
            root.join("entry.js").display(),
            root.join("entry.css").display()
        )
    );
}

#[test]
fn test_cli_json_report_file() {
    let (_guard, root) = project(&[
        ("entry.css", "a { background: url(./logo.png) }"),
        ("logo.png", "png"),
    ]);

    let output = run(
        &root,
        &["entry.css", "--outdir", "dist", "--loader", ".png=base64", "-o", "json", "--report-file", "report.json", "-q"],
    );
    assert_eq!(output.status.code(), Some(0));

    let report = fs::read_to_string(root.join("report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["graph"]["modules"].as_array().unwrap().len(), 2);
    assert_eq!(value["graph"]["modules"][1]["loader"], "base64");
}

#[test]
fn test_cli_reads_config_file() {
    let (_guard, root) = project(&[
        ("entry.css", "a { background: url(./logo.png) }"),
        ("logo.png", "png"),
        (".bundlegraph.toml", "entry_points = [\"entry.css\"]\noutput_dir = \"dist\"\nuse_colors = false\n"),
    ]);

    let output = run(&root, &["-q"]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_cli_invalid_loader_is_a_config_error() {
    let (_guard, root) = project(&[("entry.css", "")]);

    let output = run(&root, &["entry.css", "--outdir", "dist", "--loader", ".png=jpeg"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn test_cli_init_creates_config() {
    let (_guard, root) = project(&[]);

    let output = run(&root, &["--init"]);
    assert_eq!(output.status.code(), Some(0));
    let config = fs::read_to_string(root.join(".bundlegraph.toml")).unwrap();
    assert!(config.contains("parallel = true"));

    let again = run(&root, &["--init"]);
    assert!(stdout(&again).contains("already exists"));
}
