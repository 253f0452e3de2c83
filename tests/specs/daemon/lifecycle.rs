// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon spawn-on-demand and persisted state layout.

use crate::prelude::*;

#[test]
fn ed_spawns_a_daemon_on_first_use() {
    let project = Project::empty();
    let file = project.file("a.md", "hello\n");

    project.ed().arg("--path").arg(&file).passes();

    let socket_up = wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists());
    assert!(socket_up, "rpc.sock should exist once the daemon has bound it");
    assert!(project.pid_path().exists(), "daemon.pid lock file should exist");
}

#[test]
fn a_second_launch_reuses_the_running_daemon() {
    let project = Project::empty();
    let a = project.file("a.md", "one\n");
    let b = project.file("b.md", "two\n");

    project.ed().arg("--path").arg(&a).passes();
    wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists());
    let pid_after_first = std::fs::read_to_string(project.pid_path()).unwrap_or_default();

    project.ed().arg("--path").arg(&b).passes();
    let pid_after_second = std::fs::read_to_string(project.pid_path()).unwrap_or_default();

    assert_eq!(pid_after_first, pid_after_second, "the same daemon should still hold the lock file");
}

#[test]
fn a_missing_file_is_created_empty_and_opened_rather_than_rejected() {
    let project = Project::empty();
    let missing = project.path().join("nonexistent.md");

    project.ed().arg("--path").arg(&missing).passes();

    assert!(missing.exists(), "session.open should create the missing file");
    assert_eq!(project.read("nonexistent.md"), "");
}

#[test]
fn no_socket_mode_never_creates_a_daemon() {
    let project = Project::empty();
    let file = project.file("solo.md", "alone\n");

    project.ed().arg("--path").arg(&file).arg("--no-socket").passes();

    assert!(!project.socket_path().exists(), "--no-socket must not spawn a resident daemon");
}
