//! End-to-end tests for the distlog binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn distlog() -> Command {
    let mut cmd = Command::cargo_bin("distlog").unwrap();
    cmd.env_remove("DISTLOG_LOG_DIR")
        .env_remove("DISTLOG_LOG_LEVEL")
        .env_remove("RANK")
        .env_remove("WORLD_SIZE");
    cmd
}

#[test]
fn test_emit_prints_formatted_line() {
    distlog()
        .args(["emit", "hello from the cli"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("INFO "))
        .stdout(predicate::str::contains("[main.rs:"))
        .stdout(predicate::str::contains("hello from the cli"));
}

#[test]
fn test_emit_multiline_uses_carriage_return() {
    distlog()
        .args(["emit", "--level", "warning", "a\nb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a\r\nWARNING "));
}

#[test]
fn test_emit_below_threshold_is_silent() {
    distlog()
        .args(["--log-level", "error", "emit", "--level", "info", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_rank_zero_on_other_rank_is_silent() {
    distlog()
        .env("RANK", "2")
        .env("WORLD_SIZE", "4")
        .args(["emit", "--rank-zero", "only the coordinator"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    distlog()
        .env("RANK", "0")
        .env("WORLD_SIZE", "4")
        .args(["emit", "--rank-zero", "only the coordinator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("only the coordinator"));
}

#[test]
fn test_emit_writes_process_file() {
    let temp = TempDir::new().unwrap();
    distlog()
        .args(["--log-dir"])
        .arg(temp.path())
        .args(["emit", "--name", "stage2", "to disk"])
        .assert()
        .success();

    assert!(temp.path().join("default.log").exists());
    let process_logs: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with("process."))
        .collect();
    assert_eq!(process_logs.len(), 1);

    let content = std::fs::read_to_string(temp.path().join(&process_logs[0])).unwrap();
    assert!(content.contains("to disk"));
}

#[test]
fn test_bad_level_rejected() {
    distlog()
        .args(["emit", "--level", "loud", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a recognized level name"));
}

#[test]
fn test_config_console_only() {
    distlog()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("threshold:    INFO"))
        .stdout(predicate::str::contains("(console only)"))
        .stdout(predicate::str::contains("(not distributed)"));
}
