// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `edd`: the resident editor daemon binary.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use edd_daemon::{config::Config, env, listener, listener::Listener, lifecycle, service::DaemonService, DaemonState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let stdio_mode = std::env::args().any(|arg| arg == "--stdio");

    let state_dir = match env::state_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&state_dir) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
    let _log_guard = init_logging(&state_dir);
    tracing::info!("--- edd: starting (pid: {}) ---", std::process::id());

    if stdio_mode {
        return run_stdio(&state_dir).await;
    }

    let daemon = match lifecycle::startup(&state_dir).await {
        Ok(daemon) => daemon,
        Err(e) => {
            tracing::error!("Failed to start daemon: {e}");
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    // Printed once the socket is bound and the daemon can accept
    // connections, so a launcher that spawned us knows it's safe to connect.
    println!("READY");

    let DaemonState { config, service, listener, .. } = daemon;
    let listener_task = tokio::spawn(Listener::new(listener, service.clone()).run());

    tokio::select! {
        _ = listener_task => {}
        _ = service.wait_for_quit() => {}
        _ = wait_for_termination_signal() => {
            let _ = service.app_quit(edd_wire::AppQuitParams {}).await;
        }
    }

    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
}

/// Serve a single launcher over stdin/stdout instead of the shared socket.
/// Skips the lock file and socket bind entirely — a stdio daemon is
/// dedicated to the launcher that spawned it, not the resident singleton.
async fn run_stdio(state_dir: &std::path::Path) {
    let config = match Config::load(state_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to start daemon: {e}");
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };
    let service = match DaemonService::new(state_dir.to_path_buf(), config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to start daemon: {e}");
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = listener::serve_stdio(service).await {
        tracing::warn!(error = %e, "stdio connection ended");
    }
}

async fn wait_for_termination_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Logs go to `daemon.log` under the state dir, not stdout: the launcher
/// tails this file to recover a startup failure reason (`daemon_process.rs`'s
/// `parse_startup_error`), and a resident daemon has no attached terminal.
fn init_logging(state_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let filter = env::log_filter().map(EnvFilter::new).unwrap_or_else(|| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(state_dir, "daemon.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    guard
}
