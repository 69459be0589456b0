//! Integration tests for core CLI contract behavior.
//!
//! These run without capture hardware: every path they exercise either
//! lists devices (possibly zero) or fails to match a selector, both of
//! which exit 0 by design.

use predicates::prelude::*;

fn cli_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("toslink").expect("binary should build")
}

#[test]
fn help_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("toslink"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("toslink"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn no_arguments_lists_devices_and_exits_zero() {
    let mut cmd = cli_cmd();
    cmd.assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("devices."));
}

#[test]
fn unmatched_selector_lists_devices_and_exits_zero() {
    // No attached device is ever named this; the tool must fall back to
    // the listing rather than fail.
    let mut cmd = cli_cmd();
    cmd.arg("no-such-device-xyz")
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("Found"));
}

#[test]
fn listing_ignores_piped_console_input() {
    // Console input is only consumed after a device is opened; with no
    // match the process must exit without reading stdin.
    let mut cmd = cli_cmd();
    cmd.write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("devices."));
}

#[test]
fn exit_code_two_for_unknown_flag() {
    let mut cmd = cli_cmd();
    cmd.arg("--invalid-flag-xyz").assert().failure().code(2);
}

#[test]
fn exit_code_two_for_extra_positional_arguments() {
    let mut cmd = cli_cmd();
    cmd.args(["dev-a", "dev-b"]).assert().failure().code(2);
}

#[test]
fn listing_contains_no_ansi_when_piped() {
    // console styling must disable itself for non-TTY stdout
    let mut cmd = cli_cmd();
    let output = cmd.assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert!(
        !stdout.contains("\x1b["),
        "Colors should be disabled in non-TTY mode"
    );
}
