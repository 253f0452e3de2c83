// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn request_with_null_params_round_trips() {
    let req = Request::call(RequestId::Number(1), "hello", json!({}));
    let encoded = serde_json::to_string(&req).unwrap();
    let decoded: Request = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.method, "hello");
    assert_eq!(decoded.id, Some(RequestId::Number(1)));
}

#[test]
fn request_without_id_is_a_notification() {
    let req: Request = serde_json::from_str(
        r#"{"jsonrpc":"2.0","method":"app.quit","params":{}}"#,
    )
    .unwrap();
    assert!(req.is_notification());
}

#[test]
fn success_response_serializes_result_not_error() {
    let resp = Response::success(Some(RequestId::String("abc".into())), json!({"ok": true}));
    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value["result"]["ok"], json!(true));
    assert!(value.get("error").is_none());
}

#[test]
fn error_response_serializes_error_not_result() {
    let resp = Response::failure(
        Some(RequestId::Number(1)),
        RpcError::method_not_found("bogus"),
    );
    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value["error"]["code"], json!(METHOD_NOT_FOUND));
    assert!(value.get("result").is_none());
}

#[test]
fn into_result_unwraps_success() {
    let resp = Response::success(None, json!(42));
    assert_eq!(resp.into_result().unwrap(), json!(42));
}

#[test]
fn into_result_unwraps_error() {
    let resp = Response::failure(None, RpcError::internal("boom"));
    let err = resp.into_result().unwrap_err();
    assert_eq!(err.code, INTERNAL_ERROR);
}

#[test]
fn application_error_codes_fall_in_reserved_band() {
    for code in [
        AppErrorCode::ProtocolVersionTooOld,
        AppErrorCode::FileTooLarge,
        AppErrorCode::AlreadyRunning,
        AppErrorCode::SessionNotFound,
        AppErrorCode::SessionClosed,
    ] {
        assert!((-32099..=-32000).contains(&code.code()));
    }
}
