use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_cli_help_flag() {
    cargo_bin_cmd!()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminal viewer for backend queries"))
        .stdout(predicate::str::contains("--accessor"))
        .stdout(predicate::str::contains("--show-empty"));
}

#[test]
fn test_cli_version_flag() {
    cargo_bin_cmd!()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("queryview"));
}

#[test]
fn test_cli_requires_url() {
    cargo_bin_cmd!()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URLS>..."));
}

#[test]
fn test_cli_rejects_unknown_flag() {
    cargo_bin_cmd!()
        .args(["--bogus", "https://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}
