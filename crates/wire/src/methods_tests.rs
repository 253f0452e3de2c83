// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn hello_params_use_camel_case_field_names() {
    let params = HelloParams {
        client: "edd-cli".to_string(),
        client_version: Some("1.0.0".to_string()),
        protocol_version: Some(3),
    };
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["clientVersion"], json!("1.0.0"));
    assert_eq!(value["protocolVersion"], json!(3));
}

#[test]
fn session_open_result_round_trips() {
    let result = SessionOpenResult {
        session_id: SessionId::new("sess-1"),
        path: "/tmp/a.txt".to_string(),
        content: "hello".to_string(),
        revision: Revision::of("hello"),
        is_dirty: false,
    };
    let json = serde_json::to_string(&result).unwrap();
    let decoded: SessionOpenResult = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.session_id, result.session_id);
    assert_eq!(decoded.revision, result.revision);
}

#[test]
fn session_save_params_base_revision_is_optional() {
    let without: SessionSaveParams = serde_json::from_value(json!({
        "sessionId": "sess-1",
        "content": "hi",
    }))
    .unwrap();
    assert!(without.base_revision.is_none());
    assert!(!without.force);
}

#[test]
fn wait_reason_serializes_to_spec_tags() {
    assert_eq!(serde_json::to_value(WaitReason::UserClosed).unwrap(), json!("userClosed"));
    assert_eq!(serde_json::to_value(WaitReason::Timeout).unwrap(), json!("timeout"));
}

#[test]
fn method_constants_match_the_wire_names() {
    assert_eq!(method::SESSION_OPEN, "session.open");
    assert_eq!(method::SESSION_WAIT_FOR_REVISION, "session.waitForRevision");
    assert_eq!(method::APP_QUIT, "app.quit");
}
