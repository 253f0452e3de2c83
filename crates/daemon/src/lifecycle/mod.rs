// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown sequencing.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::UnixListener;

use crate::config::Config;
use crate::service::DaemonService;

/// Daemon state during operation.
///
/// The lock file is held for the life of the process; dropping it releases
/// the exclusive lock on `daemon.pid`, which is how a future `startup` call
/// detects that the previous daemon has actually exited.
pub struct DaemonState {
    pub config: Config,
    pub service: Arc<DaemonService<edd_core::SystemClock>>,
    pub listener: UnixListener,
    #[allow(dead_code)]
    lock_file: File,
}

impl DaemonState {
    /// Remove the files a clean shutdown is responsible for. The lock file
    /// itself is released by `Drop`, not removed here, since a half-removed
    /// lock file would let a second daemon start while this one is still
    /// unwinding.
    pub fn shutdown(&self) {
        if self.config.socket_path.exists() {
            let _ = std::fs::remove_file(&self.config.socket_path);
        }
    }
}

/// Lifecycle errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("service error: {0}")]
    Service(#[from] crate::service::ServiceError),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
