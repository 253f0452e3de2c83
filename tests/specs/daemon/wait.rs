// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario D (waiter released by close), observed from the launcher side:
//! `--wait` blocks, and times out cleanly rather than hanging forever when
//! nothing ever closes the window.

use crate::prelude::*;

#[test]
fn wait_times_out_with_exit_code_4_when_nothing_closes_the_window() {
    let project = Project::empty();
    let file = project.file("a.md", "hello\n");

    project.ed().arg("--path").arg(&file).arg("--wait").arg("--timeout-ms").arg("200").fails().code_is(4);
}

#[test]
fn no_socket_wait_also_honors_the_timeout() {
    let project = Project::empty();
    let file = project.file("a.md", "hello\n");

    project
        .ed()
        .arg("--path")
        .arg(&file)
        .arg("--no-socket")
        .arg("--wait")
        .arg("--timeout-ms")
        .arg("200")
        .fails()
        .code_is(4);
}
