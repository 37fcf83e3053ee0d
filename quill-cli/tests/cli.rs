use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("quill-parser")
        .join("tests")
        .join("samples")
        .join(name)
}

fn write_doc(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn parse_prints_treeviz_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "- a\n- b\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg(&doc);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("⧉ 1 blocks").and(predicate::str::contains("☰ 2 items")));
}

#[test]
fn parse_tag_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "> Intro {intro}\n\nSome text\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg(&doc).arg("--format").arg("tag");
    cmd.assert().success().stdout(
        predicate::str::contains("<root>")
            .and(predicate::str::contains("<heading weight=\"1\" id=\"intro\">")),
    );
}

#[test]
fn parse_json_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "hello\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg(&doc).arg("-f").arg("json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"diagnostics\""));
}

#[test]
fn parse_sample_with_include() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse")
        .arg(sample_path("kitchensink.qd"))
        .arg("--format")
        .arg("tag");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A closing appendix."));
}

#[test]
fn unknown_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "hello\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg(&doc).arg("--format").arg("pdf");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Available formats for documents"));
}

#[test]
fn tokenize_simple_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "- item\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("tokenize").arg(&doc);
    cmd.assert().success().stdout(
        predicate::str::contains("bullet/1(\"-\")").and(predicate::str::contains("end-of-stream")),
    );
}

#[test]
fn tokenize_json_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "hello\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("tokenize").arg(&doc).arg("--format").arg("json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"EndOfStream\""));
}

#[test]
fn diagnostics_go_to_stderr_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "<<missing.qd>>\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg(&doc);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("missing.qd"));
}

#[test]
fn missing_file_argument_prints_usage() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn unreadable_file_fails() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("parse").arg("definitely/not/here.qd");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn unknown_command_fails() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("render");
    cmd.assert().failure().code(1);
}

#[test]
fn config_file_sets_default_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "hello\n");
    let config = write_doc(dir.path(), "quill.toml", "[inspect.parse]\nformat = \"tag\"\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("--config").arg(&config).arg("parse").arg(&doc);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<paragraph>hello</paragraph>"));
}

#[test]
fn config_controls_indentation_width() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(dir.path(), "doc.qd", "a\n  b\n");
    let config = write_doc(dir.path(), "quill.toml", "[lexer]\nspaces_per_indent = 2\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.arg("tokenize").arg(&doc).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("indent+"));
}
