//! Integration tests for the nexcess CLI
//!
//! These run the built binary and check exit codes and messages for paths
//! that never reach a live API.

use std::path::Path;
use std::process::{Command, Output};

fn nexcess_binary() -> &'static str {
    env!("CARGO_BIN_EXE_nexcess")
}

/// Command with the user's own profile settings stripped out
fn nexcess(cwd: &Path) -> Command {
    let mut command = Command::new(nexcess_binary());
    command
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("NO_COLOR", "1")
        .env_remove("NEXCESS_PROFILE")
        .env_remove("NEXCESS_API_TOKEN")
        .env_remove("NEXCESS_LOG")
        .env_remove("NEXCESS_LOG_FORMAT");
    command
}

fn run_in(cwd: &Path, args: &[&str]) -> Output {
    nexcess(cwd)
        .args(args)
        .output()
        .expect("Failed to execute nexcess")
}

fn run_nexcess(args: &[&str]) -> Output {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    run_in(temp_dir.path(), args)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_nexcess_version() {
    let output = run_nexcess(&["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nexcess"));
}

#[test]
fn test_nexcess_help() {
    let output = run_nexcess(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("cloud-account"));
    assert!(stdout.contains("ssl"));
    assert!(stdout.contains("api-token"));
}

#[test]
fn test_backup_help_lists_subcommands() {
    let output = run_nexcess(&["cloud-account", "backup", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["list", "show", "create", "download", "delete"] {
        assert!(stdout.contains(name), "missing {} in:\n{}", name, stdout);
    }
}

#[test]
fn test_invalid_command() {
    let output = run_nexcess(&["no-such-command"]);

    assert!(!output.status.success());
}

#[test]
fn test_bad_list_filter_fails_before_any_request() {
    let output = run_nexcess(&["cloud-account", "list", "status"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid list filter 'status'"));
}

#[test]
fn test_missing_input_without_interaction() {
    let output = run_nexcess(&["cloud-account", "show", "-n"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("requires a value for 'id'"));
}

#[test]
fn test_missing_input_as_json() {
    let output = run_nexcess(&["api-token", "create", "-n", "--json"]);

    assert_eq!(output.status.code(), Some(1));

    let error: serde_json::Value =
        serde_json::from_str(&stderr(&output)).expect("stderr should be JSON");
    assert_eq!(error["error_type"], "MissingInput");
}

#[test]
fn test_unsupported_profile_type() {
    let output = run_nexcess(&["--profile", "settings.ini", "ssl", "list"]);

    assert_eq!(output.status.code(), Some(101));
    assert!(stderr(&output).contains("Unsupported profile type 'ini'"));
}

#[test]
fn test_unknown_config_type() {
    let output = run_nexcess(&["--profile", "acme", "ssl", "list"]);

    assert_eq!(output.status.code(), Some(101));
}

#[test]
fn test_missing_profile_file() {
    let output = run_nexcess(&["--profile", "missing.json", "ssl", "list"]);

    assert_eq!(output.status.code(), Some(101));
    assert!(stderr(&output).contains("'missing.json' could not be found"));
}

#[test]
fn test_profile_name_from_environment() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = nexcess(temp_dir.path())
        .env("NEXCESS_PROFILE", "broken.yaml")
        .args(["ssl", "list"])
        .output()
        .expect("Failed to execute nexcess");

    assert_eq!(output.status.code(), Some(101));
}

#[test]
fn test_unparseable_profile() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

    let output = run_in(temp_dir.path(), &["--profile", "broken.json", "ssl", "list"]);

    assert_eq!(output.status.code(), Some(101));
    assert!(stderr(&output).contains("could not be parsed"));
}

#[test]
fn test_profile_found_in_parent_directory() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = temp_dir.path().join("site").join("deploy");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        temp_dir.path().join("local.yaml"),
        "type: nexcess\nbase_url: http://127.0.0.1:9/\napi_token: abc\n",
    )
    .unwrap();

    // Port 9 refuses connections, so a found profile ends in a network error
    let output = run_in(&nested, &["--profile", "local.yaml", "cloud-account", "show", "5"]);

    assert_eq!(output.status.code(), Some(100));
    assert!(!stderr(&output).contains("panicked"));
}

#[test]
fn test_nexcess_only_command_refused_for_thermo_profile() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        temp_dir.path().join("thermo.yaml"),
        "type: thermo\nbase_url: http://127.0.0.1:9/\napi_token: abc\n",
    )
    .unwrap();

    let output = run_in(
        temp_dir.path(),
        &["--profile", "thermo.yaml", "cloud-account", "backup", "create", "-c", "5", "-n"],
    );

    // A request would fail with 100; refusal happens before any is sent
    assert_eq!(output.status.code(), Some(101));
    assert!(stderr(&output).contains("not available for thermo profiles"));
}
