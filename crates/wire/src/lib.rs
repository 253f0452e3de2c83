// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 wire protocol between the edd launcher CLI and daemon.
//!
//! Wire format: `Content-Length: <decimal>\r\n\r\n` followed by a UTF-8 JSON
//! object. One request, one response, per round trip on a given connection.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod envelope;
mod framing;
mod methods;

pub use envelope::{
    AppErrorCode, Request, RequestId, Response, ResponseOutcome, RpcError, INTERNAL_ERROR,
    INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use framing::{
    decode, encode, read_message, read_request, write_message, write_response, ProtocolError,
    DEFAULT_MAX_FRAME_BYTES,
};
pub use methods::{
    method, AppQuitParams, AppQuitResult, HelloCapabilities, HelloParams, HelloResult,
    SessionCloseParams, SessionCloseResult, SessionOpenParams, SessionOpenResult,
    SessionReloadParams, SessionReloadResult, SessionSaveParams, SessionSaveResult,
    SessionWaitForRevisionParams, SessionWaitForRevisionResult, SessionWaitParams,
    SessionWaitResult, WaitReason,
};
