//! Integration tests for the `omada` binary: argument rules and target
//! management, without a live controller.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Command with env isolation; the targets file points into `dir`.
fn omada_cmd(dir: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("omada");
    cmd.env("OMADA_CONFIG", dir.path().join("targets.json"))
        .env("OMADA_PASSWORD", "secret")
        .env_remove("OMADA_TARGET")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("switch-port").and(predicate::str::contains("target")));
}

#[test]
fn test_switch_port_requires_enable_or_disable() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "--port", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--enable").or(predicate::str::contains("--disable")));
}

#[test]
fn test_enable_and_disable_conflict() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "-p", "3", "--enable", "--disable"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_apply_schedule_requires_disable() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "-p", "3", "--enable", "--apply-schedule"])
        .assert()
        .code(2);
}

#[test]
fn test_port_is_required() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "--enable"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_port_zero_rejected() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "-p", "0", "--enable"])
        .assert()
        .code(2);
}

#[test]
fn test_switch_port_without_target() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["switch-port", "AA:BB:CC:DD:EE:FF", "-p", "3", "--disable"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no_target"));
}

#[test]
fn test_target_add_list_remove() {
    let dir = tempfile::tempdir().unwrap();

    omada_cmd(&dir)
        .args([
            "target",
            "add",
            "home",
            "--url",
            "https://omada.lan:8043",
            "--username",
            "admin",
            "--no-verify-ssl",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""password_stored": false"#));

    omada_cmd(&dir)
        .args(["target", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""name": "home""#)
                .and(predicate::str::contains(r#""verify_ssl": false"#))
                .and(predicate::str::contains(r#""default": true"#)),
        );

    omada_cmd(&dir)
        .args(["--table", "target", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://omada.lan:8043"));

    omada_cmd(&dir)
        .args(["target", "remove", "home"])
        .assert()
        .success();

    omada_cmd(&dir)
        .args(["target", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_target_add_rejects_bad_url() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["target", "add", "home", "--url", "omada.lan", "--username", "admin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid_input"));
}

#[test]
fn test_unknown_target() {
    let dir = tempfile::tempdir().unwrap();
    omada_cmd(&dir)
        .args(["-T", "lab", "switch-port", "Core", "-p", "1", "--enable"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("target_not_found"));
}
