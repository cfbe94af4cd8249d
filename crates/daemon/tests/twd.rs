// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the twd binary

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(deprecated)]

use assert_cmd::Command;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use predicates::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn twd on `root` and return the child with a channel of stdout lines
fn spawn_twd(root: &Path, state_home: &Path) -> (Child, Receiver<String>) {
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("twd"))
        .arg(root)
        .args(["--delay", "100ms"])
        .env("TW_STATE_DIR", state_home)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "READY");
    (child, rx)
}

/// Wait for the first stdout line containing `needle`
fn line_containing(rx: &Receiver<String>, needle: &str) -> String {
    loop {
        let line = rx.recv_timeout(TIMEOUT).unwrap();
        if line.contains(needle) {
            return line;
        }
    }
}

/// The single per-root state directory created under `state_home`
fn state_dir(state_home: &Path) -> PathBuf {
    let mut dirs: Vec<_> = std::fs::read_dir(state_home.join("watches"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(dirs.len(), 1);
    dirs.remove(0)
}

#[test]
fn help_lists_flags() {
    Command::cargo_bin("twd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--delay"))
        .stdout(predicate::str::contains("--recursive"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn missing_root_fails() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("twd")
        .unwrap()
        .arg("/nonexistent/run-dir")
        .env("TW_STATE_DIR", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("RootNotFound"));
}

#[test]
fn bad_config_file_fails() {
    let root = tempfile::tempdir().unwrap();
    let config = root.path().join("watch.toml");
    std::fs::write(&config, "delay = \"500ms\"\nunknown = 1\n").unwrap();

    Command::cargo_bin("twd")
        .unwrap()
        .arg(root.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}

#[test]
fn streams_events_and_stops_on_sigterm() {
    let root = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    let (mut child, rx) = spawn_twd(root.path(), home.path());

    std::fs::write(root.path().join("metrics.json"), b"{}\n").unwrap();
    let line = line_containing(&rx, "file:created");
    assert!(line.contains("metrics.json"), "line: {}", line);
    assert!(line.contains("observed_at"), "line: {}", line);

    let dir = state_dir(home.path());
    assert!(dir.join("twd.pid").exists());

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
    assert!(child.wait().unwrap().success());

    assert!(!dir.join("twd.pid").exists());
    let log = std::fs::read_to_string(dir.join("twd.log")).unwrap();
    assert!(log.contains("--- twd: starting (pid: "), "log: {}", log);
    assert!(log.contains("Received SIGTERM"), "log: {}", log);
}

#[test]
fn pairs_a_rename_into_one_move() {
    let root = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    let (mut child, rx) = spawn_twd(root.path(), home.path());

    let src = root.path().join("output.log.tmp");
    std::fs::write(&src, b"line\n").unwrap();
    std::fs::rename(&src, root.path().join("output.log")).unwrap();

    let line = line_containing(&rx, "file:moved");
    assert!(line.contains("output.log.tmp"), "line: {}", line);

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
    assert!(child.wait().unwrap().success());
}

#[test]
fn exits_on_its_own_when_root_is_deleted() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("run-1");
    std::fs::create_dir(&root).unwrap();
    let home = tempfile::tempdir().unwrap();
    let (mut child, rx) = spawn_twd(&root, home.path());

    std::fs::remove_dir(&root).unwrap();
    let line = line_containing(&rx, "dir:deleted");
    assert!(line.contains("run-1"), "line: {}", line);

    assert!(child.wait().unwrap().success());
    assert!(!state_dir(home.path()).join("twd.pid").exists());
}
