// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 envelope shared by every method in the protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Application error codes, reserved in the `-32000..-32099` band per
/// the envelope's own reservation of standard codes below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum AppErrorCode {
    /// Client's declared protocol version is older than the server's
    /// configured minimum; returned from `session.open`.
    ProtocolVersionTooOld = -32000,
    /// `readText` rejected the file for exceeding the size cap.
    FileTooLarge = -32001,
    /// A live peer already holds the daemon's socket.
    AlreadyRunning = -32002,
    /// `sessionId` does not name a live session.
    SessionNotFound = -32003,
    /// The session named by `sessionId` has already been closed.
    SessionClosed = -32004,
}

impl AppErrorCode {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Request id: a string, an integer, or absent (a notification).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl Request {
    pub fn call(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self { jsonrpc: JSONRPC_VERSION.to_string(), id: Some(id), method: method.into(), params }
    }

    /// A request with no `id` is a notification: the dispatcher must not
    /// send a response for it.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, message.into())
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message.into())
    }

    pub fn application(code: AppErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.code(), message.into())
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for RpcError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOutcome {
    Result { result: Value },
    Error { error: RpcError },
}

impl Response {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self { jsonrpc: JSONRPC_VERSION.to_string(), id, outcome: ResponseOutcome::Result { result } }
    }

    pub fn failure(id: Option<RequestId>, error: RpcError) -> Self {
        Self { jsonrpc: JSONRPC_VERSION.to_string(), id, outcome: ResponseOutcome::Error { error } }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            ResponseOutcome::Result { result } => Ok(result),
            ResponseOutcome::Error { error } => Err(error),
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
