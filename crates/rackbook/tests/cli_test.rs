//! Integration tests for the `rackbook` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live Rackbook server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rackbook` binary with env isolation.
///
/// Clears all `RACKBOOK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn rackbook_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rackbook");
    cmd.env("HOME", "/tmp/rackbook-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rackbook-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/rackbook-cli-test-nonexistent")
        .env_remove("RACKBOOK_PROFILE")
        .env_remove("RACKBOOK_SERVER")
        .env_remove("RACKBOOK_TOKEN")
        .env_remove("RACKBOOK_OUTPUT")
        .env_remove("RACKBOOK_INSECURE")
        .env_remove("RACKBOOK_TIMEOUT");
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
    let output = rackbook_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    rackbook_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("runbook")
            .and(predicate::str::contains("tree"))
            .and(predicate::str::contains("objects"))
            .and(predicate::str::contains("pages")),
    );
}

#[test]
fn test_version_flag() {
    rackbook_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rackbook"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    rackbook_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    rackbook_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    rackbook_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = rackbook_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_tree_no_config() {
    rackbook_cmd().arg("tree").assert().failure().stderr(
        predicate::str::contains("config")
            .or(predicate::str::contains("Configuration"))
            .or(predicate::str::contains("server"))
            .or(predicate::str::contains("profile")),
    );
}

#[test]
fn test_invalid_server_url() {
    let output = rackbook_cmd()
        .args(["--server", "not a url", "tree"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "Expected failure for bad URL");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid URL") || text.contains("server"),
        "Expected error about the server URL:\n{text}"
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    rackbook_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_location() {
    rackbook_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = rackbook_cmd()
        .args(["--output", "invalid", "tree"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_section_value() {
    let output = rackbook_cmd()
        .args(["pages", "show", "7", "hardware"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected clap usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid value"),
        "Expected error listing valid sections:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing server config, not about argument parsing.
    rackbook_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "objects",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("server"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_auth_subcommands_exist() {
    rackbook_cmd()
        .args(["auth", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("logout"))
                .and(predicate::str::contains("whoami")),
        );
}

#[test]
fn test_companies_subcommand_exists() {
    rackbook_cmd()
        .args(["companies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List companies"));

    // Reaching the server still needs a configured profile.
    rackbook_cmd().arg("companies").assert().failure().stderr(
        predicate::str::contains("config")
            .or(predicate::str::contains("server"))
            .or(predicate::str::contains("profile")),
    );
}

#[test]
fn test_objects_subcommands_exist() {
    rackbook_cmd()
        .args(["objects", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("show")));
}

#[test]
fn test_pages_subcommands_exist() {
    rackbook_cmd()
        .args(["pages", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show").and(predicate::str::contains("edit")));
}

#[test]
fn test_docs_subcommands_exist() {
    rackbook_cmd()
        .args(["docs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("add")));
}

#[test]
fn test_config_subcommands_exist() {
    rackbook_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-token")),
        );
}
