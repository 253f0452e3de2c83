// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ed`: the short-lived launcher a `$VISUAL`-style invocation execs.
//!
//! Connects to the resident `edd` daemon (spawning it on demand), opens a
//! session for one file, and — with `--wait` — blocks until the user
//! closes the editor window before exiting.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod daemon_process;
mod exit_error;
mod no_socket;

use std::path::PathBuf;

use clap::Parser;
use edd_daemon::config::Config;
use edd_wire::{SessionCloseParams, SessionOpenParams, SessionWaitParams, WaitReason};

use client::DaemonClient;
use exit_error::ExitError;

const USAGE_ERROR: i32 = 2;
const CONNECT_ERROR: i32 = 3;
const TIMEOUT_ERROR: i32 = 4;

/// Edit a file in the resident edd editor daemon.
#[derive(Parser, Debug)]
#[command(name = "ed", version)]
struct Args {
    /// File to open.
    #[arg(long)]
    path: PathBuf,

    /// Line to place the cursor on.
    #[arg(long)]
    line: Option<u32>,

    /// Column to place the cursor on.
    #[arg(long)]
    column: Option<u32>,

    /// Block until the editor window is closed.
    #[arg(long)]
    wait: bool,

    /// Timeout in milliseconds for --wait (none means no timeout).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Run the session in-process instead of over the daemon socket.
    #[arg(long)]
    no_socket: bool,

    /// Use stdin/stdout as the transport to a co-launched daemon instead of
    /// its Unix socket.
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("ed: {e}");
            std::process::exit(e.code);
        }
    }
}

async fn run(args: Args) -> Result<(), ExitError> {
    let path = resolve_path(&args.path).map_err(|e| ExitError::new(USAGE_ERROR, format!("invalid --path: {e}")))?;

    if args.no_socket {
        return no_socket::run(&path, args.line, args.column, args.wait, args.timeout_ms).await;
    }

    let state_dir = edd_daemon::env::state_dir().map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?;
    let config = Config::load(&state_dir).map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?;

    let mut client = if args.stdio {
        daemon_process::connect_stdio(&state_dir).await.map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?
    } else {
        daemon_process::connect_or_spawn(&config.socket_path, &state_dir)
            .await
            .map_err(|e| ExitError::new(CONNECT_ERROR, e.to_string()))?
    };

    client
        .hello("ed", 1)
        .await
        .map_err(|e| ExitError::new(CONNECT_ERROR, format!("handshake failed: {e}")))?;

    let opened = client
        .session_open(SessionOpenParams {
            path: path.to_string_lossy().into_owned(),
            line: args.line,
            column: args.column,
            cwd: std::env::current_dir().ok().map(|p| p.to_string_lossy().into_owned()),
            protocol_version: Some(1),
        })
        .await
        .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.open failed: {e}")))?;

    if args.wait {
        let result = client
            .session_wait(SessionWaitParams { session_id: opened.session_id.clone(), timeout_ms: args.timeout_ms })
            .await
            .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.wait failed: {e}")))?;

        if result.reason == WaitReason::Timeout {
            return Err(ExitError::new(TIMEOUT_ERROR, "timed out waiting for the editor window to close"));
        }

        client
            .session_close(SessionCloseParams { session_id: opened.session_id })
            .await
            .map_err(|e| ExitError::new(CONNECT_ERROR, format!("session.close failed: {e}")))?;
    }

    Ok(())
}

/// Canonicalize `path` without requiring it to exist: a missing file is
/// created empty by `session.open`, not by the launcher. Resolves the
/// longest existing ancestor and rejoins the missing tail onto it so the
/// daemon still receives an absolute, symlink-free path.
fn resolve_path(path: &std::path::Path) -> std::io::Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "--path has no file name"))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => std::path::Path::new("."),
    };
    let canonical_parent = parent.canonicalize()?;
    Ok(canonical_parent.join(file_name))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
