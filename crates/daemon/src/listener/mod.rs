// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accept loop and per-connection JSON-RPC dispatch.
//!
//! Each connection may carry many request/response round trips (a launcher
//! keeps one connection open across `session.open`, edits, and an eventual
//! `session.wait`), so `handle_connection` loops reading frames until the
//! peer disconnects rather than handling exactly one request.

use std::sync::Arc;

use edd_core::SystemClock;
use edd_wire::{encode, method, read_request, write_message, ProtocolError, Request, Response, RpcError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

use crate::service::DaemonService;

pub struct Listener {
    unix: UnixListener,
    service: Arc<DaemonService<SystemClock>>,
}

impl Listener {
    pub fn new(unix: UnixListener, service: Arc<DaemonService<SystemClock>>) -> Self {
        Self { unix, service }
    }

    /// Accept connections until the process is asked to exit.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let service = self.service.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &service).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!(error = %e, "accept error"),
            }
        }
    }
}

fn log_connection_error(e: ProtocolError) {
    match e {
        ProtocolError::Eof => debug!("client disconnected"),
        other => warn!(error = %other, "connection error"),
    }
}

/// Only a caller with the same Unix user id as the daemon may use the
/// socket; anything else is rejected without reading a single frame.
fn peer_is_same_user(stream: &UnixStream) -> bool {
    match stream.peer_cred() {
        Ok(cred) => cred.uid() == nix::unistd::Uid::current().as_raw(),
        Err(_) => false,
    }
}

async fn handle_connection(stream: UnixStream, service: &Arc<DaemonService<SystemClock>>) -> Result<(), ProtocolError> {
    if !peer_is_same_user(&stream) {
        warn!("rejecting connection from a different uid");
        return Ok(());
    }

    let (read_half, write_half) = stream.into_split();
    serve_stream(BufReader::new(read_half), write_half, service).await
}

/// Serve one connection's worth of request/response round trips over a
/// co-launched daemon's stdin/stdout, bypassing the socket and its
/// peer-UID check entirely: the launcher that piped these descriptors
/// already is the only possible peer.
pub async fn serve_stdio(service: Arc<DaemonService<SystemClock>>) -> Result<(), ProtocolError> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_stream(reader, writer, &service).await
}

async fn serve_stream<R, W>(
    mut reader: BufReader<R>,
    mut write_half: W,
    service: &Arc<DaemonService<SystemClock>>,
) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let request = match read_request(&mut reader, edd_wire::DEFAULT_MAX_FRAME_BYTES).await {
            Ok(request) => request,
            Err(ProtocolError::Eof) => return Ok(()),
            // The frame itself was read fine but its body isn't a well-formed
            // JSON-RPC request (bad JSON, or missing `method`) — the envelope
            // is broken, not the connection. Reply `-32600` and keep reading.
            Err(e @ (ProtocolError::InvalidUtf8 | ProtocolError::Decode(_))) => {
                warn!(error = %e, "malformed request envelope");
                let response = Response::failure(None, RpcError::invalid_request(e.to_string()));
                let body = encode(&response)?;
                write_message(&mut write_half, &body).await?;
                continue;
            }
            Err(e) => return Err(e),
        };

        // Long-polling requests are logged at debug to avoid flooding the
        // log; everything that mutates state is logged at info.
        if matches!(request.method.as_str(), method::SESSION_WAIT | method::SESSION_WAIT_FOR_REVISION | method::HELLO) {
            debug!(method = %request.method, "received request");
        } else {
            tracing::info!(method = %request.method, "received request");
        }

        let is_notification = request.is_notification();
        let id = request.id.clone();
        let method_name = request.method.clone();
        let outcome = dispatch(service, request).await;

        if is_notification {
            if let Err(e) = &outcome {
                warn!(method = %method_name, error = %e, "notification handler failed");
            }
            continue;
        }

        let response = match outcome {
            Ok(result) => Response::success(id, result),
            Err(err) => Response::failure(id, err),
        };
        let body = encode(&response)?;
        write_message(&mut write_half, &body).await?;
    }
}

async fn dispatch(service: &Arc<DaemonService<SystemClock>>, request: Request) -> Result<Value, RpcError> {
    match request.method.as_str() {
        method::HELLO => to_value(service.hello(parse_params(request.params)?)),
        method::SESSION_OPEN => to_value(service.session_open(parse_params(request.params)?).await?),
        method::SESSION_RELOAD => to_value(service.session_reload(parse_params(request.params)?).await?),
        method::SESSION_SAVE => to_value(service.session_save(parse_params(request.params)?).await?),
        method::SESSION_WAIT_FOR_REVISION => {
            to_value(service.session_wait_for_revision(parse_params(request.params)?).await?)
        }
        method::SESSION_WAIT => to_value(service.session_wait(parse_params(request.params)?).await?),
        method::SESSION_CLOSE => to_value(service.session_close(parse_params(request.params)?).await?),
        method::APP_QUIT => to_value(service.app_quit(parse_params(request.params)?).await?),
        other => Err(RpcError::method_not_found(other)),
    }
}

fn parse_params<T: DeserializeOwned>(value: Value) -> Result<T, RpcError> {
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
