// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use edd_daemon::{config::Config, service::DaemonService, Listener};
use edd_wire::HelloCapabilities;
use tempfile::tempdir;
use tokio::net::UnixListener;

async fn spawn_test_daemon(dir: &std::path::Path) -> std::path::PathBuf {
    let socket_path = dir.join("rpc.sock");
    let config = Config::defaults_for(dir);
    let service = DaemonService::new(dir.to_path_buf(), config).unwrap();
    let std_listener = std::os::unix::net::UnixListener::bind(&socket_path).unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let listener = UnixListener::from_std(std_listener).unwrap();
    tokio::spawn(Listener::new(listener, service).run());
    socket_path
}

#[tokio::test]
async fn hello_round_trips_over_a_real_connection() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path()).await;

    let mut client = DaemonClient::connect(&socket_path).await.unwrap();
    let result = client.hello("ed", 1).await.unwrap();

    assert_eq!(result.server_pid, std::process::id());
    let _: HelloCapabilities = result.capabilities;
}

#[tokio::test]
async fn session_open_then_close_round_trips() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path()).await;
    let file_path = dir.path().join("note.txt");
    std::fs::write(&file_path, "hello").unwrap();

    let mut client = DaemonClient::connect(&socket_path).await.unwrap();
    let opened = client
        .session_open(SessionOpenParams {
            path: file_path.to_string_lossy().into_owned(),
            line: None,
            column: None,
            cwd: None,
            protocol_version: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(opened.content, "hello");

    let closed = client.session_close(SessionCloseParams { session_id: opened.session_id }).await.unwrap();
    assert!(closed.ok);
}

#[tokio::test]
async fn connect_to_a_missing_socket_fails_with_a_client_error() {
    let dir = tempdir().unwrap();
    let err = DaemonClient::connect(&dir.path().join("nonexistent.sock")).await.unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }));
}
