//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_stepstreak"))
        .args(args)
        .env("STEPSTREAK_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_config_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "goal.daily_target"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10000");
}

#[test]
fn test_config_set_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "goal.daily_target", "8000"]);
    assert_eq!(code, 0, "Config set failed");

    let config = run_json(dir.path(), &["config", "list"]);
    assert_eq!(config["goal"]["daily_target"], 8000);
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "goal.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_streak_refresh_over_recorded_week() {
    let dir = tempfile::tempdir().unwrap();

    // First refresh creates the ledger with the watermark on the first day.
    run_cli(dir.path(), &["activity", "record", "2026-01-01", "12000"]);
    let first = run_json(dir.path(), &["streak", "refresh", "--today", "2026-01-01"]);
    assert_eq!(first["streak"], 1);

    for (day, amount) in [
        ("2026-01-02", "11000"),
        ("2026-01-03", "4000"),
        ("2026-01-04", "10000"),
    ] {
        let (code, _, _) = run_cli(dir.path(), &["activity", "record", day, amount]);
        assert_eq!(code, 0, "activity record failed");
    }

    let bonus = run_json(dir.path(), &["bonus", "set", "1"]);
    assert_eq!(bonus["balance"], 1);

    let result = run_json(dir.path(), &["streak", "refresh", "--today", "2026-01-04"]);
    assert_eq!(result["carried"], 1);
    assert_eq!(result["streak"], 4);
    assert_eq!(result["ledger"]["balance"], 0);
    assert_eq!(result["ledger"]["watermark"], "2026-01-04");

    let history = run_json(dir.path(), &["history", "--days", "4", "--until", "2026-01-04"]);
    let days = history.as_array().unwrap();
    assert_eq!(days.len(), 4);
    assert_eq!(days[2]["day"], "2026-01-03");
    assert_eq!(days[2]["bonus_used"], true);

    let shown = run_json(dir.path(), &["streak", "show", "--today", "2026-01-04"]);
    assert_eq!(shown["streak"], 4);
}

#[test]
fn test_streak_refresh_rejects_backward_clock() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["streak", "refresh", "--today", "2026-02-10"]);

    let (code, _, stderr) = run_cli(dir.path(), &["streak", "refresh", "--today", "2026-02-09"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Clock moved backward"));
}

#[test]
fn test_activity_list_fills_missing_days() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["activity", "record", "2026-03-02", "500"]);

    let list = run_json(
        dir.path(),
        &["activity", "list", "--days", "3", "--until", "2026-03-03"],
    );
    let amounts: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["amount"].as_u64().unwrap())
        .collect();
    assert_eq!(amounts, vec![0, 500, 0]);
}

#[test]
fn test_bonus_configure_clamps_balance() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["bonus", "set", "3"]);

    let ledger = run_json(dir.path(), &["bonus", "configure", "--max", "2", "--every", "5"]);
    assert_eq!(ledger["balance"], 2);
    assert_eq!(ledger["max_balance"], 2);
    assert_eq!(ledger["earn_every_n"], 5);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "bonus.earn_every_n"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_invalid_date_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["activity", "record", "03/02/2026", "500"]);
    assert_ne!(code, 0);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_oversized_day_window_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    for args in [
        &["history", "--days", "4000000000"][..],
        &["activity", "list", "--days", "4000000000"][..],
    ] {
        let (code, _, stderr) = run_cli(dir.path(), args);
        assert_eq!(code, 1, "{args:?} should fail cleanly: {stderr}");
        assert!(stderr.starts_with("error:"), "{args:?}: {stderr}");
    }
}

#[test]
fn test_config_set_names_valid_keys_and_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "goal.steps", "9000"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("goal.daily_target"));

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "goal.daily_target", "500"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("1000..=40000"));

    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "goal.daily_target", "9000"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "goal.daily_target = 9000");
}
