// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::Ordering;

#[test]
fn null_window_handle_starts_alive() {
    let handle = NullWindowHandle::new();
    assert!(handle.is_alive());
}

#[test]
fn null_window_handle_close_is_terminal() {
    let mut handle = NullWindowHandle::new();
    handle.close();
    assert!(!handle.is_alive());
    handle.close();
    assert!(!handle.is_alive());
}

#[test]
fn fake_window_handle_liveness_is_scriptable() {
    let mut handle = FakeWindowHandle::new_alive();
    assert!(handle.is_alive());
    handle.kill();
    assert!(!handle.is_alive());
}

#[test]
fn fake_window_handle_can_start_dead() {
    let handle = FakeWindowHandle::new_dead();
    assert!(!handle.is_alive());
}

#[test]
fn fake_window_handle_counts_focus_calls() {
    let handle = FakeWindowHandle::new_alive();
    handle.focus();
    handle.focus();
    assert_eq!(handle.focus_count.load(Ordering::SeqCst), 2);
}

#[test]
fn fake_window_handle_close_clears_liveness() {
    let mut handle = FakeWindowHandle::new_alive();
    handle.close();
    assert!(!handle.is_alive());
}
