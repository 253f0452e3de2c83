// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn record_appends_a_jsonl_line_for_the_events_day() {
    let dir = tempdir().unwrap();
    let log = TelemetryLog::new(dir.path());

    log.record(&TelemetryEvent { ts_ms: 0, event: "session.open", session_id: Some("abc"), duration_ms: Some(3) });

    let contents = std::fs::read_to_string(dir.path().join("telemetry/0.jsonl")).unwrap();
    assert!(contents.contains("\"event\":\"session.open\""));
    assert!(contents.ends_with('\n'));
}

#[test]
fn two_events_on_the_same_day_append_to_the_same_file() {
    let dir = tempdir().unwrap();
    let log = TelemetryLog::new(dir.path());

    log.record(&TelemetryEvent { ts_ms: 10, event: "a", session_id: None, duration_ms: None });
    log.record(&TelemetryEvent { ts_ms: 20, event: "b", session_id: None, duration_ms: None });

    let contents = std::fs::read_to_string(dir.path().join("telemetry/0.jsonl")).unwrap();
    assert_eq!(contents.lines().count(), 2);
}
