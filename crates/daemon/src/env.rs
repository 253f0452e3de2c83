// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

pub const DEFAULT_IPC_TIMEOUT_MS: u64 = 5000;

/// Resolve the state directory: `EDD_STATE_DIR` > `XDG_STATE_HOME/edd` >
/// `~/.local/state/edd`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("EDD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("edd"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/edd"))
}

/// Override for the config file path (`EDD_CONFIG`).
pub fn config_path_override() -> Option<PathBuf> {
    std::env::var("EDD_CONFIG").ok().map(PathBuf::from)
}

/// `tracing` `EnvFilter` directive string (`EDD_LOG`, falling back to
/// `RUST_LOG`).
pub fn log_filter() -> Option<String> {
    std::env::var("EDD_LOG").ok().or_else(|| std::env::var("RUST_LOG").ok())
}

/// Framed-RPC read/write timeout (`EDD_IPC_TIMEOUT_MS`, default 5000 ms).
pub fn ipc_timeout() -> Duration {
    std::env::var("EDD_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(DEFAULT_IPC_TIMEOUT_MS))
}

/// Pattern an `EDD_TERMINAL_BUNDLE_ID` value must match before it is ever
/// used in an OS-level focus-restore call. Never interpolated into a
/// shell string regardless.
const BUNDLE_ID_PATTERN_DESCRIPTION: &str = "^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$";

fn is_valid_bundle_id(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else { return false };
    if !first.is_ascii_alphanumeric() {
        return false;
    }
    let rest_len = value.len() - first.len_utf8();
    if rest_len > 127 {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Validated terminal bundle id hint (`EDD_TERMINAL_BUNDLE_ID`), used only
/// to restore terminal focus after the launcher quits. Returns `None` if
/// unset or if the value fails validation.
pub fn terminal_bundle_id() -> Option<String> {
    let value = std::env::var("EDD_TERMINAL_BUNDLE_ID").ok()?;
    if is_valid_bundle_id(&value) {
        Some(value)
    } else {
        tracing::warn!(
            pattern = BUNDLE_ID_PATTERN_DESCRIPTION,
            "ignoring EDD_TERMINAL_BUNDLE_ID: does not match the allowed pattern"
        );
        None
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
