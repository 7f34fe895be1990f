//! Integration tests for the pycst binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file
}

#[test]
fn test_treeviz_output() {
    let file = write_fixture("x = 1\n");
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Module"))
        .stdout(predicate::str::contains("AssignmentStatement"));
}

#[test]
fn test_source_round_trip() {
    let source = "def f(a):\n    return a  # comment\n";
    let file = write_fixture(source);
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .args(["--format", "source"])
        .assert()
        .success()
        .stdout(source);
}

#[test]
fn test_diagnostics_exit_code() {
    let file = write_fixture("def f(:\n");
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .args(["--format", "diagnostics"])
        .assert()
        .code(1);
}

#[test]
fn test_check_flags_unclosed_resource() {
    let file = write_fixture("f = open(path)\n");
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .args(["--format", "check"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("finally"));
}

#[test]
fn test_unknown_level_is_rejected() {
    let file = write_fixture("x = 1\n");
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .args(["--language-level", "9.9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown language level"));
}

#[test]
fn test_tokens_format_is_json() {
    let file = write_fixture("x\n");
    Command::cargo_bin("pycst")
        .unwrap()
        .arg(file.path())
        .args(["--format", "tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\""));
}
