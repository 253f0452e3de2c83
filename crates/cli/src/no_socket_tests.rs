// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn opens_and_waits_without_any_ipc() {
    let dir = tempdir().unwrap();
    std::env::set_var("EDD_STATE_DIR", dir.path());
    let file_path = dir.path().join("note.txt");
    std::fs::write(&file_path, "hello").unwrap();

    // no --wait: should return as soon as the session is open.
    run(&file_path, None, None, false, None).await.unwrap();
}

#[tokio::test]
async fn opening_a_missing_file_creates_it_like_the_socket_path_does() {
    let dir = tempdir().unwrap();
    std::env::set_var("EDD_STATE_DIR", dir.path());
    let file_path = dir.path().join("new.txt");

    run(&file_path, None, None, false, None).await.unwrap();

    assert!(file_path.exists());
}
