// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Config;
use edd_wire::{HelloParams, HelloResult, RequestId};
use serde_json::json;
use tempfile::tempdir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

fn spawn_test_daemon(dir: &std::path::Path) -> std::path::PathBuf {
    let socket_path = dir.join("rpc.sock");
    let config = Config::defaults_for(dir);
    let service = DaemonService::new(dir.to_path_buf(), config).unwrap();
    let unix = std::os::unix::net::UnixListener::bind(&socket_path).unwrap();
    unix.set_nonblocking(true).unwrap();
    let unix = UnixListener::from_std(unix).unwrap();
    let listener = Listener::new(unix, service);
    tokio::spawn(listener.run());
    socket_path
}

async fn roundtrip(socket_path: &std::path::Path, method: &str, params: Value) -> Response {
    let stream = UnixStream::connect(socket_path).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = Request::call(RequestId::Number(1), method, params);
    let body = encode(&request).unwrap();
    write_message(&mut write_half, &body).await.unwrap();

    read_response(&mut reader).await
}

async fn read_response<R: tokio::io::AsyncBufRead + Unpin>(reader: &mut R) -> Response {
    let mut content_length = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some((_, value)) = trimmed.split_once(':') {
            content_length = Some(value.trim().parse::<usize>().unwrap());
        }
    }
    let mut body = vec![0u8; content_length.unwrap()];
    tokio::io::AsyncReadExt::read_exact(reader, &mut body).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn hello_round_trips_over_the_socket() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path());

    let params = serde_json::to_value(HelloParams { client: "test".to_string(), ..Default::default() }).unwrap();
    let response = roundtrip(&socket_path, method::HELLO, params).await;

    let result: HelloResult = serde_json::from_value(response.into_result().unwrap()).unwrap();
    assert_eq!(result.server_pid, std::process::id());
}

#[tokio::test]
async fn unknown_method_returns_method_not_found() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path());

    let response = roundtrip(&socket_path, "bogus.method", json!({})).await;
    let err = response.into_result().unwrap_err();
    assert_eq!(err.code, edd_wire::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn malformed_params_return_invalid_params() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path());

    let response = roundtrip(&socket_path, method::SESSION_OPEN, json!({"path": 7})).await;
    let err = response.into_result().unwrap_err();
    assert_eq!(err.code, edd_wire::INVALID_PARAMS);
}

#[tokio::test]
async fn malformed_envelope_returns_invalid_request_and_keeps_the_connection_open() {
    let dir = tempdir().unwrap();
    let socket_path = spawn_test_daemon(dir.path());

    let stream = UnixStream::connect(&socket_path).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Well-framed body, but missing the required `method` field.
    let body = serde_json::to_vec(&json!({"jsonrpc": "2.0", "id": 1})).unwrap();
    write_message(&mut write_half, &body).await.unwrap();

    let response = read_response(&mut reader).await;
    let err = response.into_result().unwrap_err();
    assert_eq!(err.code, edd_wire::INVALID_REQUEST);

    // The connection must still be usable for a subsequent, well-formed call.
    let params = serde_json::to_value(HelloParams { client: "test".to_string(), ..Default::default() }).unwrap();
    let request = Request::call(RequestId::Number(2), method::HELLO, params);
    write_message(&mut write_half, &encode(&request).unwrap()).await.unwrap();
    let hello_response = read_response(&mut reader).await;
    let result: HelloResult = serde_json::from_value(hello_response.into_result().unwrap()).unwrap();
    assert_eq!(result.server_pid, std::process::id());
}
