// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_honors_explicit_override() {
    std::env::set_var("EDD_STATE_DIR", "/tmp/edd-explicit");
    std::env::remove_var("XDG_STATE_HOME");
    let dir = state_dir().unwrap();
    std::env::remove_var("EDD_STATE_DIR");
    assert_eq!(dir, PathBuf::from("/tmp/edd-explicit"));
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg() {
    std::env::remove_var("EDD_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    let dir = state_dir().unwrap();
    std::env::remove_var("XDG_STATE_HOME");
    assert_eq!(dir, PathBuf::from("/tmp/xdg/edd"));
}

#[test]
#[serial]
fn ipc_timeout_defaults_when_unset() {
    std::env::remove_var("EDD_IPC_TIMEOUT_MS");
    assert_eq!(ipc_timeout(), Duration::from_millis(DEFAULT_IPC_TIMEOUT_MS));
}

#[test]
#[serial]
fn ipc_timeout_honors_override() {
    std::env::set_var("EDD_IPC_TIMEOUT_MS", "1500");
    let timeout = ipc_timeout();
    std::env::remove_var("EDD_IPC_TIMEOUT_MS");
    assert_eq!(timeout, Duration::from_millis(1500));
}

#[test]
#[serial]
fn terminal_bundle_id_accepts_valid_values() {
    std::env::set_var("EDD_TERMINAL_BUNDLE_ID", "com.apple.Terminal");
    let id = terminal_bundle_id();
    std::env::remove_var("EDD_TERMINAL_BUNDLE_ID");
    assert_eq!(id.as_deref(), Some("com.apple.Terminal"));
}

#[test]
#[serial]
fn terminal_bundle_id_rejects_values_starting_with_punctuation() {
    std::env::set_var("EDD_TERMINAL_BUNDLE_ID", "-not-valid");
    let id = terminal_bundle_id();
    std::env::remove_var("EDD_TERMINAL_BUNDLE_ID");
    assert!(id.is_none());
}

#[test]
#[serial]
fn terminal_bundle_id_rejects_values_over_128_chars() {
    let too_long = "a".repeat(129);
    std::env::set_var("EDD_TERMINAL_BUNDLE_ID", &too_long);
    let id = terminal_bundle_id();
    std::env::remove_var("EDD_TERMINAL_BUNDLE_ID");
    assert!(id.is_none());
}

#[test]
fn is_valid_bundle_id_rejects_empty() {
    assert!(!is_valid_bundle_id(""));
}
