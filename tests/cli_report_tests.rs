//! End-to-end tests for the treereport binary
//!
//! Each test writes a small directory of report files and checks the
//! printed output.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_report(dir: &Path, name: &str, options: &str, leaves: u64, size: u64) {
    let text = format!(
        "=== Run information ===\n\
         Options: {options}\n\
         \n\
         J48 pruned tree\n\
         ------------------\n\
         \n\
         Number of Leaves  : \t{leaves}\n\
         \n\
         Size of the tree : \t{size}\n"
    );
    fs::write(dir.join(name), text).unwrap();
}

fn sample_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), "a.txt", "-C 0.25 -M 2", 5, 9);
    write_report(dir.path(), "b.txt", "-U -M 4", 3, 5);
    write_report(dir.path(), "c.txt", "-C 0.5 -M 6", 9, 17);
    write_report(dir.path(), "d.txt", "-U -C 0.1 -M 8", 1, 1);
    dir
}

#[test]
fn test_best_leaves_text_report() {
    let dir = sample_dir();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("treereport");
    cmd.arg(dir.path())
        .arg("0")
        .arg("2")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Specific run: LEAVES"))
        .stdout(predicate::str::contains("THOSE ARE ACTUALLY THE 2 BEST values!"))
        .stdout(predicate::str::contains("Filename: d.txt"))
        .stdout(predicate::str::contains("Filename: b.txt"))
        .stdout(predicate::str::contains("Filename: c.txt").not())
        .stdout(predicate::str::contains("unpruned 1\n"))
        .stdout(predicate::str::contains("min_num_obj 6\n"))
        .stdout(predicate::str::contains("THIS IS THE FULL RUN FOR ALL VALUES:"))
        .stdout(predicate::str::contains("min_num_obj 5\n"));
}

#[test]
fn test_worst_trees_selection_order() {
    let dir = sample_dir();
    let output = assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg(dir.path())
        .arg("1")
        .arg("2")
        .arg("0")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Specific run: TREES"));
    assert!(stdout.contains("2 WORST values!"));
    let a = stdout.find("Filename: a.txt").expect("a.txt selected");
    let c = stdout.find("Filename: c.txt").expect("c.txt selected");
    assert!(a < c, "worst tail should stay in ascending order");
}

#[test]
fn test_json_output() {
    let dir = sample_dir();
    let output = assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg("--format")
        .arg("json")
        .arg(dir.path())
        .arg("leaves")
        .arg("10")
        .arg("best")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["metric"], "leaves");
    assert_eq!(value["specific"]["selection"].as_array().unwrap().len(), 4);
    assert_eq!(value["full"]["averages"]["unpruned"], 0.5);
    assert!(value["excluded"].as_array().unwrap().is_empty());
}

#[test]
fn test_malformed_report_is_reported_and_excluded() {
    let dir = sample_dir();
    fs::write(dir.path().join("README"), "not a report\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg(dir.path())
        .arg("0")
        .arg("1")
        .arg("1")
        .assert()
        .success()
        .stderr(predicate::str::contains("Excluded 1 malformed report(s):"))
        .stderr(predicate::str::contains("README"))
        .stdout(predicate::str::contains("Filename: d.txt"));
}

#[test]
fn test_strict_mode_fails_on_malformed_report() {
    let dir = sample_dir();
    fs::write(dir.path().join("README"), "not a report\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg("--strict")
        .arg(dir.path())
        .arg("0")
        .arg("1")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed report"));
}

#[test]
fn test_missing_options_line_fails_with_filename() {
    let dir = sample_dir();
    fs::write(
        dir.path().join("orphan.txt"),
        "Number of Leaves : 40\nSize of the tree : 79\n",
    )
    .unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg(dir.path())
        .arg("0")
        .arg("1")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("orphan.txt"))
        .stderr(predicate::str::contains("Options:"));
}

#[test]
fn test_zero_count_rejected() {
    let dir = sample_dir();
    assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg(dir.path())
        .arg("0")
        .arg("0")
        .arg("1")
        .assert()
        .failure();
}

#[test]
fn test_missing_directory_fails() {
    assert_cmd::cargo::cargo_bin_cmd!("treereport")
        .arg("/nonexistent/treereport/runs")
        .arg("0")
        .arg("3")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/treereport/runs"));
}
