use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("boardlink")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ports"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("upload"));
}

#[test]
fn version_prints() {
    Command::cargo_bin("boardlink")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("boardlink"));
}

#[test]
fn rejects_unknown_subcommand() {
    Command::cargo_bin("boardlink")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn send_rejects_infinite_timeout() {
    Command::cargo_bin("boardlink")
        .unwrap()
        .args(["send", "/dev/ttyACM0", "hello", "--timeout", "inf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn send_rejects_malformed_port() {
    Command::cargo_bin("boardlink")
        .unwrap()
        .args(["send", "not-a-port", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid port"));
}
