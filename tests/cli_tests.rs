//! Integration tests for the `pdl` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the fmt, get, hash
//! and json subcommands through the actual binary, including stdin/stdout
//! piping, file output and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn sample_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.pdl")
}

fn sample() -> pdl::Parameters {
    pdl::parse_file(sample_path()).expect("sample.pdl fixture must parse")
}

fn pdl_cmd() -> Command {
    Command::cargo_bin("pdl").unwrap()
}

#[test]
fn fmt_stdin_to_stdout_cooked() {
    pdl_cmd()
        .arg("fmt")
        .write_stdin("{a=1;b={c=\"x\";};}")
        .assert()
        .success()
        .stdout("{\n    a=1;\n    b={\n        c=\"x\";\n    };\n}\n");
}

#[test]
fn fmt_canonical_from_file() {
    let expected = pdl::to_string(&sample());
    pdl_cmd()
        .args(["fmt", "--canonical", "-i", sample_path()])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn fmt_to_output_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdl");
    pdl_cmd()
        .args(["fmt", "-i", sample_path(), "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(pdl::parse_file(&out).unwrap(), sample());
}

#[test]
fn fmt_empty_document() {
    pdl_cmd()
        .arg("fmt")
        .write_stdin("// nothing\n")
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn get_string_prints_bare() {
    pdl_cmd()
        .args(["get", "-i", sample_path(), "servers[1]/host"])
        .assert()
        .success()
        .stdout("beta\n");
}

#[test]
fn get_hex_integer() {
    pdl_cmd()
        .args(["get", "-i", sample_path(), "servers[1]/port"])
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn get_node_prints_canonical() {
    pdl_cmd()
        .args(["get", "-i", sample_path(), "limits"])
        .assert()
        .success()
        .stdout("{cpu=2.5;memory=4096;}\n");
}

#[test]
fn get_missing_path_fails() {
    pdl_cmd()
        .args(["get", "-i", sample_path(), "limits/gpu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No value at path: limits/gpu"));
}

#[test]
fn hash_matches_library() {
    let expected = format!("{}\n", sample().structural_hash());
    pdl_cmd()
        .args(["hash", "-i", sample_path()])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn hash_ignores_formatting() {
    let canonical = pdl::to_string(&sample());
    let expected = format!("{}\n", sample().structural_hash());
    pdl_cmd()
        .arg("hash")
        .write_stdin(canonical)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn json_output() {
    let output = pdl_cmd()
        .args(["json", "-i", sample_path()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "render farm");
    assert_eq!(json["servers"][1]["port"], 8080);
    assert_eq!(json["secret"], serde_json::json!([0xde, 0xad, 0xbe, 0xef]));
}

#[test]
fn parse_error_reports_line() {
    pdl_cmd()
        .arg("hash")
        .write_stdin("{\n  a = 1;\n  b = ;\n}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn unterminated_block_error() {
    pdl_cmd()
        .arg("fmt")
        .write_stdin("{a=1;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected end of stream"));
}

#[test]
fn missing_input_file() {
    pdl_cmd()
        .args(["hash", "-i", "/nonexistent/input.pdl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
