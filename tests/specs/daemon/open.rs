// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario A (open-edit-save), the half of it visible from the launcher:
//! opening a file never mutates it, and a fresh session is handed a window
//! without disturbing the file on disk.

use crate::prelude::*;

#[test]
fn opening_a_file_leaves_its_content_untouched() {
    let project = Project::empty();
    let file = project.file("a.md", "hello\n");

    project.ed().arg("--path").arg(&file).passes();

    assert_eq!(project.read("a.md"), "hello\n", "opening a session must not write to disk");
}

#[test]
fn opening_with_a_cursor_position_still_succeeds() {
    let project = Project::empty();
    let file = project.file("a.md", "line one\nline two\n");

    project.ed().arg("--path").arg(&file).arg("--line").arg("2").arg("--column").arg("3").passes();
}

#[test]
fn opening_the_same_path_twice_reuses_the_live_session() {
    let project = Project::empty();
    let file = project.file("a.md", "hello\n");

    project.ed().arg("--path").arg(&file).passes();
    wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists());

    // A second open of the same file against the still-running daemon must
    // not error even though the window from the first open is still "open"
    // (NullWindowHandle never dies on its own).
    project.ed().arg("--path").arg(&file).passes();

    assert_eq!(project.read("a.md"), "hello\n");
}
