// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connect to a running daemon, or spawn one and wait for its socket to
//! come up. The daemon detaches itself (its own process group, stdio
//! closed) once `lifecycle::startup` has bound the socket, so the launcher
//! never waits on the child's stdout — it polls for the socket file and,
//! on timeout, reads the daemon's own log for a startup failure reason.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::client::{ClientError, DaemonClient};

const SPAWN_POLL_INTERVAL: Duration = Duration::from_millis(50);
const SPAWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to launch the daemon binary: {0}")]
    Exec(#[source] std::io::Error),
    #[error("daemon did not start within {0:?}: {1}")]
    Timeout(Duration, String),
}

/// Connect to an already-running daemon; if none is listening, spawn one
/// and retry with a bounded backoff until its socket appears.
pub async fn connect_or_spawn(socket_path: &Path, state_dir: &Path) -> Result<DaemonClient, SpawnError> {
    if let Ok(client) = DaemonClient::connect(socket_path).await {
        return Ok(client);
    }

    spawn_daemon(state_dir)?;

    let deadline = std::time::Instant::now() + SPAWN_TIMEOUT;
    loop {
        match DaemonClient::connect(socket_path).await {
            Ok(client) => return Ok(client),
            Err(ClientError::Connect { .. }) if std::time::Instant::now() < deadline => {
                tokio::time::sleep(SPAWN_POLL_INTERVAL).await;
            }
            Err(_) => break,
        }
    }

    let reason = read_startup_failure(state_dir).unwrap_or_else(|| "daemon did not bind its socket in time".to_string());
    Err(SpawnError::Timeout(SPAWN_TIMEOUT, reason))
}

fn spawn_daemon(state_dir: &Path) -> Result<(), SpawnError> {
    let daemon_path = find_daemon_binary();
    Command::new(daemon_path)
        .env("EDD_STATE_DIR", state_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(SpawnError::Exec)?;
    Ok(())
}

/// Look for a sibling `edd` binary next to this executable before falling
/// back to `PATH`, so a locally built launcher picks up its own daemon.
fn find_daemon_binary() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("edd");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("edd")
}

/// Spawn a daemon dedicated to this one launcher, talking over its piped
/// stdin/stdout instead of the shared Unix socket. Used for sandboxes where
/// the socket path is unavailable or undesirable.
pub async fn connect_stdio(state_dir: &Path) -> Result<DaemonClient, SpawnError> {
    let daemon_path = find_daemon_binary();
    let mut child = Command::new(daemon_path)
        .arg("--stdio")
        .env("EDD_STATE_DIR", state_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(SpawnError::Exec)?;

    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
        return Err(SpawnError::Exec(std::io::Error::other("spawned daemon had no piped stdio")));
    };
    Ok(DaemonClient::from_io(stdout, stdin))
}

fn read_startup_failure(state_dir: &Path) -> Option<String> {
    let log = std::fs::read_to_string(state_dir.join("daemon.log")).ok()?;
    parse_startup_error(&log)
}

/// Scan a daemon log for the last startup attempt's failure reason, if
/// any. Startup attempts are delimited by a `--- edd: starting (pid: N)
/// ---` marker line; only the segment after the *last* marker is
/// considered, so a prior crash's error doesn't mask a later success.
fn parse_startup_error(log: &str) -> Option<String> {
    let last_attempt = log.rsplit_once("starting (pid").map(|(_, after)| after).unwrap_or(log);

    last_attempt
        .lines()
        .filter_map(|line| line.find("ERROR").map(|at| line[at + "ERROR".len()..].trim()))
        .last()
        .map(|message| message.strip_prefix("Failed to start daemon: ").unwrap_or(message).to_string())
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
