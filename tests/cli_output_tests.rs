// CLI behavior: reading probe logs and writing synthesized series

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SCENARIO: &str = r#"{
    "io__entry": [
        {"pid": 42, "event_time": 1000000000},
        {"pid": 42, "event_time": 1200000000}
    ],
    "io__return": [
        {"pid": 42, "event_time": 1500000000},
        {"pid": 42, "event_time": 2100000000}
    ],
    "monitor__wait": [
        {"pid": 42, "event_time": 1300000000}
    ]
}"#;

fn write_log(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Output files
// ============================================================================

#[test]
fn test_csv_written_next_to_input() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg(&log).assert().success();

    let csv = fs::read_to_string(dir.path().join("run-lre.csv")).unwrap();
    assert_eq!(csv, "ts,event,value\n1000,io,2\n2000,io,0\n");
}

#[test]
fn test_output_dir_and_counts() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("--counts")
        .arg("-o")
        .arg(out.path())
        .arg(&log)
        .assert()
        .success();

    assert!(out.path().join("run-lre.csv").exists());
    let counts = fs::read_to_string(out.path().join("run-counts.csv")).unwrap();
    assert!(counts.starts_with("ts,probe,events\n"));
    assert!(counts.contains("1000,io__entry,2"));
    assert!(counts.contains("1000,monitor__wait,1"));
    assert!(counts.contains("2000,io__return,1"));
}

// ============================================================================
// Stdout rendering
// ============================================================================

#[test]
fn test_stdout_csv() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("--stdout")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("ts,event,value"))
        .stdout(predicate::str::contains("1000,io,2"))
        .stdout(predicate::str::contains("2000,io,0"))
        .stdout(predicate::str::contains("monitor").not());
}

#[test]
fn test_stdout_json() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let output = Command::cargo_bin("probesynth")
        .unwrap()
        .args(["--stdout", "--format", "json"])
        .arg(&log)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["bucket_size_ms"], 1000);
    assert_eq!(report["strategy"], "cumulative-delta");
    assert_eq!(report["points"][0]["ts"], 1000);
    assert_eq!(report["points"][0]["event"], "io");
    assert_eq!(report["points"][0]["value"], 2);
    assert_eq!(report["skipped"][0]["kind"], "monitor");
}

#[test]
fn test_bucket_size_flag() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    // 2000 ms windows put everything but the last return in window 0
    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.args(["--stdout", "-b", "2000"])
        .arg(&log)
        .assert()
        .success()
        .stdout("ts,event,value\n0,io,2\n2000,io,0\n");
}

#[test]
fn test_strategy_flag() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.args(["--stdout", "--strategy", "net-outstanding"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("1000,io,1"))
        .stdout(predicate::str::contains("2000,io,0"));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);
    let config = write_log(&dir, "probesynth.toml", "bucket_size_ms = 500\n");

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("--stdout")
        .arg("--config")
        .arg(&config)
        .arg(&log)
        .assert()
        .success()
        .stdout("ts,event,value\n1000,io,2\n1500,io,1\n2000,io,0\n");
}

#[test]
fn test_probe_filter_breaks_pair() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.args(["--stdout", "--probes", "/^io__entry$/"])
        .arg(&log)
        .assert()
        .success()
        .stdout("ts,event,value\n");
}

#[test]
fn test_empty_log_gives_header_only() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "empty.json", "{}");

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("--stdout")
        .arg(&log)
        .assert()
        .success()
        .stdout("ts,event,value\n");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_zero_bucket_size_rejected() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.args(["-b", "0"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_negative_bucket_size_rejected() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.args(["-b", "-5"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket_size_ms must be > 0"));
}

#[test]
fn test_missing_file_reports_path() {
    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("/nonexistent/run.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/run.json"));
}

#[test]
fn test_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "bad.json", "[1, 2, 3]");

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid probe log"));
}

#[test]
fn test_unpaired_kind_warns_on_stderr() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "run.json", SCENARIO);

    let mut cmd = Command::cargo_bin("probesynth").unwrap();
    cmd.arg("--stdout")
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping probe kind"));
}
