//! Integration tests for `efs-stack config` command.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn efs_stack() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("efs-stack"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    efs_stack()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

// ---------------------------------------------------------------------------
// `efs-stack config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_no_config_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "show"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("EfsStack"))
        .stdout(predicate::str::contains("10.0.0.0/16"))
        .stdout(predicate::str::contains("t2.micro"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn test_config_show_displays_env_var_label() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "show"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("EFS_STACK_CONFIG:"));
}

#[test]
fn test_config_show_json() {
    let (_dir, path) = temp_config_path();
    let output = efs_stack()
        .args(["config", "show", "--json"])
        .env("EFS_STACK_CONFIG", &path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["config"]["network"]["max_azs"], 2);
    assert_eq!(v["config"]["instance"]["type"], "t2.micro");
    assert_eq!(v["path"], path);
}

// ---------------------------------------------------------------------------
// `efs-stack config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "instance.type", "t3.small"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set instance.type = t3.small"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("t3.small"), "{content}");

    efs_stack()
        .args(["config", "show"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("t3.small"));
}

#[cfg(unix)]
#[test]
fn test_config_set_writes_owner_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "network.max_azs", "3"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "security.level", "strict"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("security.level"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_profile_lists_valid_values() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "security.profile", "paranoid"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("open"))
        .stderr(predicate::str::contains("restricted"));
}

#[test]
fn test_config_set_quiet_suppresses_confirmation() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["-q", "config", "set", "stack.name", "Demo"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_set_rejects_cidr_incompatible_with_subnet_mask() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "network.cidr", "10.0.0.0/24"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Subnet mask /24"));
    assert!(!std::path::Path::new(&path).exists());

    efs_stack()
        .arg("validate")
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .success();
}

#[test]
fn test_config_set_rejects_more_than_three_zones() {
    let (_dir, path) = temp_config_path();
    efs_stack()
        .args(["config", "set", "network.max_azs", "4"])
        .env("EFS_STACK_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid values: 1-3"));
    assert!(!std::path::Path::new(&path).exists());
}
