use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("siwa")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_status_help_shows_signal_flag() {
    cargo_bin_cmd!("siwa")
        .args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--signal"))
        .stdout(predicate::str::contains("--wait-secs"));
}

#[test]
fn test_status_rejects_invalid_signal() {
    cargo_bin_cmd!("siwa")
        .args(["status", "u1", "--signal", "granted"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid platform signal"));
}
