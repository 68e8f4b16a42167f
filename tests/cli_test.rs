//! End-to-end tests of the `maillog` binary.

#![allow(clippy::expect_used)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to run the binary against `server`.
fn maillog(server: &str) -> Command {
    let mut cmd = Command::cargo_bin("maillog").expect("binary built");
    cmd.env_remove("RUST_LOG").env("MAILLOG_SERVER", server);
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("maillog")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("learn-spam"))
        .stdout(predicate::str::contains("console"));
}

#[test]
fn test_bad_server_url() {
    maillog("ftp://mail.example.com")
        .arg("ping")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: configuration error"));
}

#[test]
fn test_bad_server_url_json_error() {
    maillog("not a url")
        .args(["--format", "json", "ping"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\": \"config\""));
}

#[test]
fn test_ping_and_list() {
    let server = common::spawn_backend_thread();

    maillog(&server)
        .arg("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("is up"));

    maillog(&server)
        .args(["list", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice page 2"))
        .stdout(predicate::str::contains("Weekly digest"));

    maillog(&server)
        .args(["--format", "json", "list", "-q", "nothing"])
        .assert()
        .success()
        .stdout("[]");
}

#[test]
fn test_show_view_and_download() {
    let server = common::spawn_backend_thread();

    maillog(&server)
        .args(["show", &format!("{server}/#uuid=abc-1")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject:      Invoice"))
        .stdout(predicate::str::contains("#uuid=abc-1"));

    maillog(&server)
        .args(["view", "abc-1", "--as", "html"])
        .assert()
        .success()
        .stdout("<p>Please pay.</p>\n");

    maillog(&server)
        .args(["view", "abc-1", "--as", "log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("the log view is disabled on this server"));

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("saved.eml");
    maillog(&server)
        .args(["download", "abc-1", "-o"])
        .arg(&path)
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(&path).expect("read download"),
        common::RAW_MESSAGE
    );
}

#[test]
fn test_learn_needs_confirmation() {
    let server = common::spawn_backend_thread();

    maillog(&server)
        .args(["learn-ham", "abc-1"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    maillog(&server)
        .args(["learn-spam", "abc-1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully reported abc-1 as spam."))
        .stdout(predicate::str::contains("failed  http://backup:11334: timeout"));

    maillog(&server)
        .args(["learn-spam", "abc-2", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No successful request was made."))
        .stderr(predicate::str::contains(
            "failed  http://rspamd:11334: dial tcp: connection refused",
        ));
}

#[test]
fn test_console_quits_on_end_of_input() {
    let server = common::spawn_backend_thread();
    let dir = TempDir::new().expect("temp dir");
    let prefs = dir.path().join("console.json");

    maillog(&server)
        .env("XDG_CACHE_HOME", dir.path())
        .args(["console", "--no-live", "--verbose", "--prefs"])
        .arg(&prefs)
        .write_stdin("grow 2\nquit\n")
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Relay").or(predicate::str::contains("Mail Archive")))
        .stderr(predicate::str::contains("console started").not());

    let saved = std::fs::read_to_string(&prefs).expect("prefs saved");
    assert!(saved.contains("\"list_height\": 12"));

    // Console logs stay off the terminal.
    if cfg!(target_os = "linux") {
        let log = std::fs::read_to_string(dir.path().join("maillog-console/console.log"))
            .expect("console log written");
        assert!(log.contains("console started"));
    }
}
