// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonClient`: one framed JSON-RPC connection to the daemon socket.
//!
//! One request in flight at a time per connection, matching the daemon's
//! own per-connection dispatch loop — the launcher never pipelines, since
//! it only ever needs `hello`, `session.open`, and eventually
//! `session.wait`/`session.close` on the same connection.

use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicI64, Ordering};

use edd_wire::{
    decode, encode, method, read_message, write_message, AppQuitParams, AppQuitResult, HelloParams, HelloResult,
    ProtocolError, Request, RequestId, Response, SessionCloseParams, SessionCloseResult, SessionOpenParams,
    SessionOpenResult, SessionReloadParams, SessionReloadResult, SessionSaveParams, SessionSaveResult,
    SessionWaitForRevisionParams, SessionWaitForRevisionResult, SessionWaitParams, SessionWaitResult,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to the daemon socket at {path}: {source}")]
    Connect { path: std::path::PathBuf, source: std::io::Error },
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("the daemon returned an error: {0}")]
    Rpc(#[from] edd_wire::RpcError),
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

type BoxedReader = Pin<Box<dyn AsyncRead + Send>>;
type BoxedWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// Speaks the framed JSON-RPC protocol over any `AsyncRead`/`AsyncWrite`
/// pair — a Unix socket in the common case, or a co-launched daemon's
/// stdin/stdout when run with `--stdio`.
pub struct DaemonClient {
    reader: BufReader<BoxedReader>,
    writer: BoxedWriter,
    next_id: AtomicI64,
}

impl DaemonClient {
    pub async fn connect(socket_path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|source| ClientError::Connect { path: socket_path.to_path_buf(), source })?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self::from_io(read_half, write_half))
    }

    pub fn from_io(reader: impl AsyncRead + Send + 'static, writer: impl AsyncWrite + Send + 'static) -> Self {
        Self { reader: BufReader::new(Box::pin(reader)), writer: Box::pin(writer), next_id: AtomicI64::new(1) }
    }

    async fn call<P: serde::Serialize, R: serde::de::DeserializeOwned>(
        &mut self,
        method: &str,
        params: P,
    ) -> Result<R, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::call(RequestId::Number(id), method, serde_json::to_value(params).map_err(ClientError::Decode)?);
        let body = encode(&request)?;
        write_message(&mut self.writer, &body).await?;

        let body = read_message(&mut self.reader, edd_wire::DEFAULT_MAX_FRAME_BYTES).await?;
        let response: Response = decode(&body)?;
        let result = response.into_result()?;
        serde_json::from_value(result).map_err(ClientError::Decode)
    }

    pub async fn hello(&mut self, client: &str, protocol_version: u32) -> Result<HelloResult, ClientError> {
        self.call(
            method::HELLO,
            HelloParams { client: client.to_string(), client_version: None, protocol_version: Some(protocol_version) },
        )
        .await
    }

    pub async fn session_open(&mut self, params: SessionOpenParams) -> Result<SessionOpenResult, ClientError> {
        self.call(method::SESSION_OPEN, params).await
    }

    pub async fn session_reload(&mut self, params: SessionReloadParams) -> Result<SessionReloadResult, ClientError> {
        self.call(method::SESSION_RELOAD, params).await
    }

    pub async fn session_save(&mut self, params: SessionSaveParams) -> Result<SessionSaveResult, ClientError> {
        self.call(method::SESSION_SAVE, params).await
    }

    pub async fn session_wait_for_revision(
        &mut self,
        params: SessionWaitForRevisionParams,
    ) -> Result<SessionWaitForRevisionResult, ClientError> {
        self.call(method::SESSION_WAIT_FOR_REVISION, params).await
    }

    pub async fn session_wait(&mut self, params: SessionWaitParams) -> Result<SessionWaitResult, ClientError> {
        self.call(method::SESSION_WAIT, params).await
    }

    pub async fn session_close(&mut self, params: SessionCloseParams) -> Result<SessionCloseResult, ClientError> {
        self.call(method::SESSION_CLOSE, params).await
    }

    pub async fn app_quit(&mut self) -> Result<AppQuitResult, ClientError> {
        self.call(method::APP_QUIT, AppQuitParams {}).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
