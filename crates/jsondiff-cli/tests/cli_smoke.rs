use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

const ORIGINAL: &str = r#"{"key2":2,"key3":null,"key4":[{"a":1,"b":true},{"a":2,"b":false},{"a":3}]}"#;
const NEW: &str = r#"{"key3":null}"#;

fn write_tempfile(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create tempfile");
    write!(file, "{contents}").expect("write tempfile");
    file
}

fn jsondiff() -> Command {
    Command::cargo_bin("jsondiff").expect("binary jsondiff should be built")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn help_succeeds() {
    jsondiff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Diff and patch JSON and YAML documents."));
}

#[test]
fn version_banner() {
    jsondiff().arg("-version").assert().success().stdout(predicate::str::contains("jsondiff version"));
}

#[test]
fn diff_prints_json_patch_by_default() {
    let lhs = write_tempfile(ORIGINAL);
    let rhs = write_tempfile(NEW);

    jsondiff()
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .code(1)
        .stdout("[{\"op\":\"remove\",\"path\":\"/key2\"},{\"op\":\"remove\",\"path\":\"/key4\"}]\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn equal_inputs_exit_zero() {
    let lhs = write_tempfile(r#"{"a":[1,2]}"#);
    let rhs = write_tempfile(r#"{ "a": [1, 2] }"#);

    jsondiff().arg(lhs.path()).arg(rhs.path()).assert().success().stdout("[]\n");
}

#[test]
fn single_argument_reads_stdin() {
    let lhs = write_tempfile(ORIGINAL);

    jsondiff()
        .arg("-f")
        .arg("merge")
        .arg(lhs.path())
        .write_stdin(NEW)
        .assert()
        .code(1)
        .stdout("{\"key2\":null,\"key4\":null}\n");
}

#[test]
fn paths_format_uses_uri_fragments() {
    let lhs = write_tempfile(ORIGINAL);
    let rhs = write_tempfile(NEW);

    let output = jsondiff()
        .args(["--uri-fragment", "-f", "paths"])
        .arg(lhs.path())
        .arg(rhs.path())
        .output()
        .expect("command runs");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"removed": ["#/key2", "#/key4"], "added": [], "modified": []})
    );
}

#[test]
fn summary_counts_differences() {
    let lhs = write_tempfile(r#"{"a":1,"b":2}"#);
    let rhs = write_tempfile(r#"{"a":3,"c":4}"#);

    let output = jsondiff().args(["-f", "summary"]).arg(lhs.path()).arg(rhs.path()).output().unwrap();
    let summary = stdout_json(&output);
    assert_eq!(summary["removed"], 1);
    assert_eq!(summary["added"], 1);
    assert_eq!(summary["modified"], 1);
    assert_eq!(summary["diff"], 3);
}

#[test]
fn opts_enable_rearrangement() {
    let lhs = write_tempfile(r#"[{"id":1},{"id":2}]"#);
    let rhs = write_tempfile(r#"[{"id":2},{"id":1}]"#);

    jsondiff()
        .args(["--opts", r#"["REARRANGE_ARRAYS"]"#])
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn unknown_opts_name_fails() {
    let lhs = write_tempfile("{}");
    let rhs = write_tempfile("{}");

    jsondiff()
        .args(["--opts", r#"["FAST"]"#])
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown diff option: FAST"));
}

#[test]
fn patch_mode_applies_json_patch() {
    let patch = write_tempfile(r#"[{"op":"copy","path":"/1","from":"/0"}]"#);

    jsondiff().arg("-p").arg(patch.path()).write_stdin(r#"["AAA"]"#).assert().success().stdout("[\"AAA\",\"AAA\"]\n");
}

#[test]
fn patch_mode_applies_merge_patch() {
    let patch = write_tempfile(r#"{"a":null,"b":{"c":1}}"#);
    let doc = write_tempfile(r#"{"a":1,"b":{"d":2}}"#);

    jsondiff()
        .args(["-p", "--merge"])
        .arg(patch.path())
        .arg(doc.path())
        .assert()
        .success()
        .stdout("{\"b\":{\"d\":2,\"c\":1}}\n");
}

#[test]
fn patch_mode_reports_failed_test() {
    let patch = write_tempfile(r#"[{"op":"test","path":"/a","value":2}]"#);

    jsondiff()
        .arg("-p")
        .arg(patch.path())
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("test failed at \"/a\""));
}

#[test]
fn diff_output_round_trips_through_patch_mode() {
    let lhs = write_tempfile(r#"{"list":[1,2,3],"obj":{"x":"y"}}"#);
    let rhs_text = r#"{"list":[3],"obj":{"x":"z","w":[true]}}"#;
    let rhs = write_tempfile(rhs_text);
    let patch_file = NamedTempFile::new().unwrap();

    jsondiff().arg("-o").arg(patch_file.path()).arg(lhs.path()).arg(rhs.path()).assert().code(1);

    let output = jsondiff().arg("-p").arg(patch_file.path()).arg(lhs.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::from_str::<Value>(rhs_text).unwrap());
}

#[test]
fn yaml_input_is_accepted() {
    let lhs = write_tempfile("a: 1\nb: [x]\n");
    let rhs = write_tempfile("a: 2\nb: [x]\n");

    jsondiff()
        .args(["--yaml", "-f", "paths"])
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"modified\":[\"/a\"]"));
}

#[test]
fn invalid_json_is_an_error() {
    let lhs = write_tempfile("{");
    let rhs = write_tempfile("{}");

    jsondiff()
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse first input"));
}
