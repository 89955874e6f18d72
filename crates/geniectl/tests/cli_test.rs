//! Integration tests for the `geniectl` binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live server.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `geniectl` binary with env isolation.
///
/// Clears all `GENIEACS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn geniectl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("geniectl").unwrap();
    cmd.env("HOME", "/tmp/geniectl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/geniectl-test-nonexistent")
        .env_remove("GENIEACS_PROFILE")
        .env_remove("GENIEACS_ENDPOINT")
        .env_remove("GENIEACS_USERNAME")
        .env_remove("GENIEACS_PASSWORD")
        .env_remove("GENIEACS_OUTPUT")
        .env_remove("GENIEACS_INSECURE")
        .env_remove("GENIEACS_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = geniectl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    geniectl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("params"))
            .and(predicate::str::contains("wifi"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    geniectl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("geniectl"));
}

#[test]
fn test_unknown_subcommand_fails() {
    geniectl_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    geniectl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    geniectl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("geniectl"));
}

// ── Config commands (no server needed) ──────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    geniectl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_config_uses_defaults() {
    geniectl_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

// ── Connection-requiring commands fail cleanly without config ───────

#[test]
fn test_devices_list_without_endpoint_fails_with_help() {
    let output = geniectl_cmd().args(["devices", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("endpoint") || text.contains("config init"),
        "expected endpoint guidance, got:\n{text}"
    );
}

#[test]
fn test_endpoint_flag_without_password_reports_credentials() {
    let output = geniectl_cmd()
        .args(["devices", "list", "--endpoint", "http://127.0.0.1:7557"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("credentials") || text.contains("GENIEACS_PASSWORD"),
        "expected credentials guidance, got:\n{text}"
    );
}

#[test]
fn test_invalid_endpoint_url_is_a_usage_error() {
    let output = geniectl_cmd()
        .args(["devices", "list", "--endpoint", "not a url"])
        .env("GENIEACS_PASSWORD", "secret")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid URL"),
        "expected URL validation error, got:\n{text}"
    );
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_params_set_requires_value() {
    geniectl_cmd()
        .args(["params", "set", "dev-1", "Device.X"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_watch_rejects_non_numeric_interval() {
    geniectl_cmd()
        .args(["watch", "--interval-minutes", "soon"])
        .assert()
        .failure()
        .code(2);
}
