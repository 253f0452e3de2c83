// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use fs2::FileExt;
use tokio::net::UnixListener;
use tracing::info;

use crate::config::Config;
use crate::service::DaemonService;

use super::{DaemonState, LifecycleError};

/// Start the daemon rooted at `state_dir`.
pub async fn startup(state_dir: &Path) -> Result<DaemonState, LifecycleError> {
    match startup_inner(state_dir).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock — those
            // files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(state_dir);
            }
            Err(e)
        }
    }
}

async fn startup_inner(state_dir: &Path) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(state_dir)?;
    std::fs::set_permissions(state_dir, std::fs::Permissions::from_mode(0o700))?;

    // 1. Acquire lock file first — prevents races between two launchers
    // both trying to start a daemon at once.
    let lock_path = state_dir.join("daemon.pid");
    let lock_file =
        std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 2. Load configuration now that we hold the lock.
    let config = Config::load(state_dir)?;

    // 3. Remove a stale socket and bind (last — only after validation passes).
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;
    std::fs::set_permissions(&config.socket_path, std::fs::Permissions::from_mode(0o600))?;

    // 4. Build the session service and start its background sweep.
    let service = DaemonService::new(state_dir.to_path_buf(), config.clone())?;
    service.spawn_orphan_sweep();

    info!(socket = %config.socket_path.display(), "daemon started");
    Ok(DaemonState { config, service, listener, lock_file })
}

/// Clean up resources on startup failure.
fn cleanup_on_failure(state_dir: &Path) {
    let socket_path = state_dir.join("rpc.sock");
    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
    }
    let lock_path = state_dir.join("daemon.pid");
    if lock_path.exists() {
        let _ = std::fs::remove_file(&lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
