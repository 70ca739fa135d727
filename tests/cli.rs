use assert_cmd::Command;
use predicates::prelude::*;

use ngffmeta::model::io_json::read_metadata_json;
use ngffmeta::NgffVersion;

fn ngffmeta() -> Command {
    let mut cmd = Command::cargo_bin("ngffmeta").unwrap();
    cmd.env_remove("NGFFMETA_TARGET_VERSION");
    cmd
}

#[test]
fn runs() {
    ngffmeta()
        .assert()
        .success()
        .stdout(predicate::str::contains("ngffmeta"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = ngffmeta();
    cmd.arg("-V");
    cmd.assert().success().stdout("ngffmeta 0.1.0\n");
}

// Validate subcommand tests

#[test]
fn validate_valid_document_succeeds() {
    let mut cmd = ngffmeta();
    cmd.args(["validate", "tests/fixtures/sample_valid.v04.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
}

#[test]
fn validate_invalid_document_fails() {
    let mut cmd = ngffmeta();
    cmd.args(["validate", "tests/fixtures/sample_invalid.v05.json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("InvalidTransformSequence"))
        .stdout(predicate::str::contains("DimensionMismatch"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn validate_warnings_pass_unless_strict() {
    let mut cmd = ngffmeta();
    cmd.args(["validate", "tests/fixtures/sample_warnings.v05.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 error(s) and 1 warning(s)"));

    let mut cmd = ngffmeta();
    cmd.args(["validate", "tests/fixtures/sample_warnings.v05.json", "--strict"]);
    cmd.assert().failure();
}

#[test]
fn validate_json_output_format() {
    let mut cmd = ngffmeta();
    cmd.args([
        "validate",
        "tests/fixtures/sample_globals.v06.json",
        "--output",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"0.6\""))
        .stdout(predicate::str::contains("\"error_count\": 0"))
        .stdout(predicate::str::contains("\"warning_count\": 0"));
}

#[test]
fn validate_nonexistent_file_fails() {
    let mut cmd = ngffmeta();
    cmd.args(["validate", "nonexistent_file.json"]);
    cmd.assert().failure();
}

// Convert subcommand tests

#[test]
fn convert_v04_to_v06_writes_stdout() {
    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_valid.v04.json", "--to", "0.6"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"0.6\""))
        .stdout(predicate::str::contains("\"coordinateSystems\""))
        .stdout(predicate::str::contains("scale0_to_physical"))
        .stderr(predicate::str::contains("route: 0.4 -> 0.5 -> 0.6"));
}

#[test]
fn convert_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("converted.json");

    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_valid.v04.json", "--to", "v05"]);
    cmd.arg("--output").arg(&output);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let converted = read_metadata_json(&output).unwrap();
    assert_eq!(converted.version(), NgffVersion::V05);
    assert_eq!(converted.dataset_paths(), vec!["0", "1", "2"]);
}

#[test]
fn convert_target_from_environment() {
    let mut cmd = ngffmeta();
    cmd.env("NGFFMETA_TARGET_VERSION", "latest");
    cmd.args(["convert", "tests/fixtures/sample_valid.v04.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"0.6\""));
}

#[test]
fn convert_lossy_requires_flag() {
    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_globals.v06.json", "--to", "0.5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Warnings (2):"))
        .stderr(predicate::str::contains("--allow-lossy"));

    let mut cmd = ngffmeta();
    cmd.args([
        "convert",
        "tests/fixtures/sample_globals.v06.json",
        "--to",
        "0.5",
        "--allow-lossy",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"axes\""))
        .stdout(predicate::str::contains("coordinateSystems").not());
}

#[test]
fn convert_json_report() {
    let mut cmd = ngffmeta();
    cmd.args([
        "convert",
        "tests/fixtures/sample_globals.v06.json",
        "--to",
        "0.5",
        "--allow-lossy",
        "--report",
        "json",
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("\"code\": \"drop_global_transformations\""))
        .stderr(predicate::str::contains("\"code\": \"drop_coordinate_systems\""));
}

#[test]
fn convert_rotation_to_v05_fails() {
    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_rotation.v06.json", "--to", "0.5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Transform 'rotation'"));
}

#[test]
fn convert_unknown_version_fails() {
    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_valid.v04.json", "--to", "0.7"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported version '0.7'"));
}

#[test]
fn convert_invalid_document_fails() {
    let mut cmd = ngffmeta();
    cmd.args(["convert", "tests/fixtures/sample_invalid.v05.json", "--to", "0.4"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Schema violation in '0'"));
}
