//! Integration tests for `siwa status` against the scripted platform.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("siwa.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn status_json(config: &Path, user_id: &str) -> serde_json::Value {
    let output = cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(config)
        .args(["status", user_id])
        .env_remove("SIWA_LOG")
        .output()
        .unwrap();
    assert!(output.status.success(), "status failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_status_maps_platform_signals() {
    let dir = tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
[platform]
default_signal = "not_found"

[platform.users]
"u-authorized" = "authorized"
"u-revoked" = "revoked"
"u-transferred" = "transferred"
"#,
    );

    let cases = [
        ("u-authorized", "authenticated"),
        ("u-revoked", "logged_out"),
        ("u-transferred", "undefined"),
        ("u-missing", "undefined"),
    ];
    for (user_id, expected) in cases {
        let state = status_json(&config, user_id);
        assert_eq!(state["authentication_state"], expected, "{user_id}");
    }
}

#[test]
fn test_status_error_signal_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir, "[platform]\ndefault_signal = \"error\"\n");

    cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(&config)
        .args(["status", "u1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"authentication_state\": \"undefined\""))
        .stderr(predicate::str::contains("unknown credential state"));
}

#[test]
fn test_status_unrecognized_signal_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir, "");

    cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(&config)
        .args(["status", "u1", "--signal", "unknown:7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credential status query for 'u1' failed"));
}

#[test]
fn test_status_signal_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir, "[platform.users]\n\"u1\" = \"revoked\"\n");

    cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(&config)
        .args(["status", "u1", "--signal", "authorized"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authentication_state\": \"authenticated\""));
}

#[test]
fn test_status_times_out_when_platform_is_slow() {
    let dir = tempdir().unwrap();
    let config = write_config(
        &dir,
        "query_timeout_secs = 1\n[platform]\ndefault_signal = \"authorized\"\ndelay_ms = 5000\n",
    );

    cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(&config)
        .args(["status", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown credential state"));
}

#[test]
fn test_status_rejects_broken_config() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir, "query_timeout_secs = \"soon\"\n");

    cargo_bin_cmd!("siwa")
        .arg("--config")
        .arg(&config)
        .args(["status", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}
