// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--no-socket`: drive a session in-process, with no daemon and no IPC.
//!
//! Builds the same `DaemonService` the resident daemon uses, but talks to it
//! directly instead of through a framed connection. Meant for environments
//! where a background daemon can't be spawned (a locked-down sandbox, a CI
//! runner) — `--wait` still works, since the service's own waiter channels
//! don't care whether the caller is a socket peer or the same process.

use std::path::Path;

use edd_daemon::config::Config;
use edd_daemon::service::DaemonService;
use edd_wire::{SessionCloseParams, SessionOpenParams, SessionWaitParams, WaitReason};

use crate::exit_error::ExitError;

const CONNECT_ERROR: i32 = 3;
const TIMEOUT_ERROR: i32 = 4;

pub async fn run(path: &Path, line: Option<u32>, column: Option<u32>, wait: bool, timeout_ms: Option<u64>) -> Result<(), ExitError> {
    let state_dir = edd_daemon::env::state_dir().map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?;
    let config = Config::load(&state_dir).map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?;
    let service = DaemonService::new(state_dir, config).map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?;

    let opened = service
        .session_open(SessionOpenParams {
            path: path_string(path),
            line,
            column,
            cwd: std::env::current_dir().ok().map(|p| p.to_string_lossy().into_owned()),
            protocol_version: Some(1),
        })
        .await
        .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.open failed: {e}")))?;

    if wait {
        let result = service
            .session_wait(SessionWaitParams { session_id: opened.session_id.clone(), timeout_ms })
            .await
            .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.wait failed: {e}")))?;

        if result.reason == WaitReason::Timeout {
            return Err(ExitError::new(TIMEOUT_ERROR, "timed out waiting for the editor window to close"));
        }

        service
            .session_close(SessionCloseParams { session_id: opened.session_id })
            .await
            .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.close failed: {e}")))?;
    }

    Ok(())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
#[path = "no_socket_tests.rs"]
mod tests;
