//! CLI argument parsing tests for vtsend and vtrecv
//!
//! These verify that the documented flags and argument forms keep parsing
//! correctly. All invocations include --help so nothing actually connects.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn vtsend_help_runs() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn vtsend_version_runs() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn vtsend_send_delay_duration() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["--send-delay", "250ms", "--help"])
        .assert()
        .success();
}

#[test]
fn vtsend_verbose_and_quiet_flags() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["-vv", "-q", "--help"])
        .assert()
        .success();
}

#[test]
fn vtsend_summary_flag() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["--summary", "--help"])
        .assert()
        .success();
}

#[test]
fn vtsend_max_workers_numeric() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["--max-workers", "4", "--help"])
        .assert()
        .success();
}

#[test]
fn vtsend_requires_three_positional_args() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["input.bin", "localhost"])
        .assert()
        .failure();
}

#[test]
fn vtsend_rejects_non_numeric_port() {
    Command::cargo_bin("vtsend")
        .unwrap()
        .args(["input.bin", "localhost", "not-a-port"])
        .assert()
        .failure();
}

#[test]
fn vtrecv_help_runs() {
    Command::cargo_bin("vtrecv")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn vtrecv_version_runs() {
    Command::cargo_bin("vtrecv")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn vtrecv_read_buffer_size() {
    Command::cargo_bin("vtrecv")
        .unwrap()
        .args(["--read-buffer", "128KiB", "--help"])
        .assert()
        .success();
}

#[test]
fn vtrecv_timestamp_log_path() {
    Command::cargo_bin("vtrecv")
        .unwrap()
        .args(["--timestamp-log", "/tmp/ts.txt", "--help"])
        .assert()
        .success();
}

#[test]
fn vtrecv_requires_two_positional_args() {
    Command::cargo_bin("vtrecv")
        .unwrap()
        .args(["output.bin"])
        .assert()
        .failure();
}
