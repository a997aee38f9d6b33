//! End-to-end runs of the `commentator` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commentator"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env_remove("COMMENTATOR_LOG")
        .output()
        .expect("spawn commentator")
}

fn corpus(dir: &Path) {
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(
        dir.join("src/a.cpp"),
        "// loop counter\nint i = 0;\n// loop counter\nint j = 0;\n",
    )
    .unwrap();
    std::fs::write(dir.join("src/b.cpp"), "int k;\nint base = 0xA000;\n").unwrap();
}

#[test]
fn learn_then_suggest_writes_outputs() {
    let tmp = TempDir::new().unwrap();
    corpus(tmp.path());
    std::fs::write(tmp.path().join("domain.json"), r#"{"0xA000": "Terrain Height Base"}"#).unwrap();

    let learned = run(tmp.path(), &["learn", "-s", "src", "-o", "model.json"]);
    assert!(learned.status.success(), "{}", String::from_utf8_lossy(&learned.stderr));
    let model = std::fs::read_to_string(tmp.path().join("model.json")).unwrap();
    assert!(model.contains("loop counter"));

    let suggested = run(
        tmp.path(),
        &["suggest", "-s", "src", "--patterns", "model.json", "-o", "report.md"],
    );
    assert!(suggested.status.success(), "{}", String::from_utf8_lossy(&suggested.stderr));
    let report = std::fs::read_to_string(tmp.path().join("report.md")).unwrap();
    assert!(report.starts_with("# Comment Suggestions Report"));
    assert!(report.contains("Terrain Height Base"));
}

#[test]
fn json_format_defaults_to_json_extension() {
    let tmp = TempDir::new().unwrap();
    corpus(tmp.path());

    let out = run(tmp.path(), &["suggest", "-s", "src", "--format", "json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = std::fs::read_to_string(tmp.path().join("comment_suggestions_report.json")).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert!(text.contains("\"suggestions\""));
}

#[test]
fn missing_source_root_exits_with_io_status() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["suggest", "-s", "does-not-exist"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn corrupt_model_exits_with_integrity_status() {
    let tmp = TempDir::new().unwrap();
    corpus(tmp.path());
    std::fs::write(tmp.path().join("bad.json"), "not json").unwrap();

    let out = run(tmp.path(), &["suggest", "-s", "src", "--patterns", "bad.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!tmp.path().join("comment_suggestions_report.md").exists());
}

#[test]
fn zero_suggestions_still_succeed() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("empty")).unwrap();

    let out = run(tmp.path(), &["suggest", "-s", "empty"]);
    assert!(out.status.success());
    assert!(tmp.path().join("comment_suggestions_report.md").exists());
}
