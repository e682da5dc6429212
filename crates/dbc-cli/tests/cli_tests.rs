//! Integration tests for the dbc CLI
//!
//! These tests invoke the actual `dbc` binary and verify:
//! - Exit codes (0 = contract holds, 1 = violation, 2 = error)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn dbc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dbc"))
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/signatures/{}", name))
        .to_string_lossy()
        .into_owned()
}

fn run_dbc(args: &[&str]) -> std::process::Output {
    Command::new(dbc_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute dbc")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("should be valid JSON")
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_dbc(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dbc"), "should contain 'dbc'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_reports_core_version() {
    let output = run_dbc(&["version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&format!("dbc-core {}", dbc_core::VERSION)),
        "stdout was: {}",
        stdout
    );
}

#[test]
fn test_version_flag() {
    let output = run_dbc(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
}

// ── Check ─────────────────────────────────────────────────

#[test]
fn test_check_passing_call() {
    let output = run_dbc(&["check", &fixture("f-int-str.json"), "--args", r#"[1, "a"]"#]);
    assert!(output.status.success(), "matching call should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ok"));
}

#[test]
fn test_check_input_violation() {
    let output = run_dbc(&["check", &fixture("f-int-str.json"), "--args", "[1, 2]"]);
    assert_eq!(output.status.code(), Some(1), "violation should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("f requires str for y."),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_check_input_violation_json() {
    let output = run_dbc(&[
        "check",
        &fixture("f-int-str.json"),
        "--args",
        "[1, 2]",
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["ok"], false);
    assert_eq!(json["kind"], "input_violation");
    assert_eq!(json["message"], "f requires str for y.");
    assert_eq!(json["subject"], "f");
    assert_eq!(json["parameter"], "y");
}

#[test]
fn test_check_declared_return() {
    let ok = run_dbc(&[
        "check",
        &fixture("ratio-returns-num.json"),
        "--args",
        "[1, 2.0]",
        "--returns",
        "0.5",
    ]);
    assert!(ok.status.success());

    let bad = run_dbc(&[
        "check",
        &fixture("ratio-returns-num.json"),
        "--args",
        "[1, 2.0]",
        "--returns",
        r#""5""#,
        "--json",
    ]);
    assert_eq!(bad.status.code(), Some(1));
    let json = stdout_json(&bad);
    assert_eq!(json["kind"], "output_violation");
    assert_eq!(json["message"], "ratio should return int or float.");
    assert_eq!(json["parameter"], serde_json::Value::Null);
}

#[test]
fn test_check_skips_loose_annotations() {
    let output = run_dbc(&[
        "check",
        &fixture("loosely-annotated.json"),
        "--args",
        r#"[null, "wide", [], 3]"#,
        "--returns",
        r#"{"anything": true}"#,
    ]);
    assert!(
        output.status.success(),
        "non-type annotations should be skipped: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_check_still_enforces_typed_parameter_after_loose_ones() {
    let output = run_dbc(&[
        "check",
        &fixture("loosely-annotated.json"),
        "--args",
        r#"[null, null, null, "three"]"#,
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("describe requires int for count."));
}

#[test]
fn test_check_arity_mismatch_is_error() {
    let output = run_dbc(&["check", &fixture("f-int-str.json"), "--args", "[1]"]);
    assert_eq!(output.status.code(), Some(2), "arity mismatch should exit 2");
}

#[test]
fn test_check_bad_parameter_name_is_error() {
    let output = run_dbc(&[
        "check",
        &fixture("bad-parameter-name.json"),
        "--args",
        "[1]",
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["kind"], "shape");
}

#[test]
fn test_check_nonexistent_file() {
    let output = run_dbc(&["check", "nonexistent.json"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
}

#[test]
fn test_check_args_must_be_array() {
    let output = run_dbc(&["check", &fixture("f-int-str.json"), "--args", "{}"]);
    assert_eq!(output.status.code(), Some(2));
}

// ── Value ─────────────────────────────────────────────────

#[test]
fn test_value_argument_passes() {
    let output = run_dbc(&["value", "1", "--types", "int,float", "--param", "num"]);
    assert!(output.status.success());
}

#[test]
fn test_value_argument_violation_names_subject() {
    let output = run_dbc(&[
        "value",
        r#""""#,
        "--types",
        "int,float",
        "--param",
        "num",
        "--subject",
        "average",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("average requires int or float for num."));
}

#[test]
fn test_value_output_violation_three_types() {
    let output = run_dbc(&["value", "8.7", "--types", "list,str,dict", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["kind"], "output_violation");
    assert_eq!(json["message"], "main should return list, str, or dict.");
}

#[test]
fn test_value_json_report_echoes_checked_value() {
    let output = run_dbc(&["value", r#"[1, "a"]"#, "--types", "dict", "--param", "data", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["message"], "main requires dict for data.");
    assert_eq!(json["value"], serde_json::json!([1, "a"]));
}

#[test]
fn test_value_violation_shows_found_value() {
    let output = run_dbc(&["value", "8.7", "--types", "int"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("found:"), "stderr was: {}", stderr);
    assert!(stderr.contains("8.7 (float)"), "stderr was: {}", stderr);
}

#[test]
fn test_check_json_report_has_no_value() {
    let output = run_dbc(&["check", &fixture("f-int-str.json"), "--args", r#"[1, "a"]"#, "--json"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["ok"], true);
    assert_eq!(json["value"], serde_json::Value::Null);
}

#[test]
fn test_value_negative_number() {
    let output = run_dbc(&["value", "-3", "--types", "int"]);
    assert!(output.status.success());
}

#[test]
fn test_value_unknown_type_is_error() {
    let output = run_dbc(&["value", "1", "--types", "integer"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_value_bad_parameter_name_is_error() {
    let output = run_dbc(&["value", "1", "--types", "int", "--param", "2nd"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("check_argument requires an identifier for parameter_name."));
}
