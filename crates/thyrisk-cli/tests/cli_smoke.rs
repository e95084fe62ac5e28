//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `thyrisk` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("thyrisk").unwrap()
}

/// Single stump on feature 0 (Age): older than 50 is class "1".
fn write_forest(path: &Path) {
    let forest = serde_json::json!({
        "classes": ["0", "1"],
        "n_features": 16,
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [50.0, -2.0, -2.0],
            "value": [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]
        }]
    });
    std::fs::write(path, forest.to_string()).unwrap();
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("predict"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("thyrisk"));
}

// ---------------------------------------------------------------------------
// Predict subcommand
// ---------------------------------------------------------------------------

#[test]
fn predict_requires_input() {
    cmd()
        .arg("predict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<input>"));
}

#[test]
fn predict_rejects_unknown_variant() {
    cmd()
        .args(["predict", "forms.csv", "--variant", "zebra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn predict_scores_csv_with_forest_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("forest.json");
    let input = dir.path().join("forms.csv");
    let output = dir.path().join("scored.csv");
    write_forest(&model);
    std::fs::write(&input, "Age,Gender\n35,female\n70,male\n").unwrap();

    cmd()
        .arg("predict")
        .arg(&input)
        .arg("--model")
        .arg(&model)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Completed scoring 2 record(s), 1 predicted recurrence"));

    let scored = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = scored.lines().collect();
    assert_eq!(lines[0], "Age,Gender,prediction,label,message");
    assert!(lines[1].starts_with("35,female,no_recurrence,0,"));
    assert!(lines[2].starts_with("70,male,recurrence,1,"));
}

#[test]
fn predict_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("forest.json");
    let input = dir.path().join("forms.tsv");
    let config = dir.path().join("config.json");
    write_forest(&model);
    std::fs::write(&input, "Age\tGender\n80\tM\n").unwrap();
    std::fs::write(
        &config,
        serde_json::json!({
            "variant": "dataset",
            "model": { "kind": "forest", "path": model }
        })
        .to_string(),
    )
    .unwrap();

    // Forest labels are the strings "0"/"1", which the dataset variant casts.
    cmd()
        .arg("predict")
        .arg(&input)
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("80\tM\trecurrence\t1\t"));
}

#[test]
fn predict_missing_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forms.csv");
    std::fs::write(&input, "Age\n40\n").unwrap();

    cmd()
        .arg("predict")
        .arg(&input)
        .args(["--model", "/nonexistent/forest.json"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Serve subcommand
// ---------------------------------------------------------------------------

#[test]
fn serve_missing_model_fails() {
    cmd()
        .args([
            "serve",
            "--model",
            "/nonexistent/forest.json",
            "--bind",
            "127.0.0.1:0",
        ])
        .assert()
        .failure();
}

#[test]
fn serve_rejects_unknown_model_kind() {
    cmd()
        .args(["serve", "--model-kind", "svm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
