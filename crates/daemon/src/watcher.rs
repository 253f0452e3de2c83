// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory watcher: a coalesced "something changed" signal for one file.
//!
//! Built on `notify`'s recommended watcher, watching the file's *parent*
//! directory (so renames or replacements of the file itself are observed)
//! and filtering down to events whose path matches the target file name.
//! The watcher never delivers content — it only wakes its caller, who
//! re-reads the file and decides what happened.
//!
//! A short-lived `notify` watcher cannot reliably observe every network or
//! sandboxed filesystem; `edd_daemon::service`'s revision-wait long poll
//! backstops this with a 20ms polling fallback while a caller is actually
//! suspended on a revision change, per SPEC_FULL §4.3's implementation note.

use notify::{Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to set up watcher: {0}")]
    Setup(#[from] notify::Error),
}

pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(75);

/// Watches one file's parent directory for the lifetime of this value.
/// Stop is implicit and idempotent: dropping it tears down the underlying
/// watcher exactly once, via normal `Drop` semantics.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `target`, sending a coalesced `()` on `tx` whenever an
    /// event plausibly touching it is observed. Events arriving within
    /// `settle_window` of the first are folded into a single signal.
    pub fn spawn(
        target: PathBuf,
        settle_window: Duration,
        tx: mpsc::UnboundedSender<()>,
    ) -> Result<Self, WatchError> {
        let parent = target.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let file_name = target.file_name().map(|n| n.to_owned());

        let (raw_tx, raw_rx) = std_mpsc::channel::<NotifyEvent>();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<NotifyEvent>| {
            if let Ok(event) = res {
                let _ = raw_tx.send(event);
            }
        })?;
        watcher.watch(&parent, RecursiveMode::NonRecursive)?;

        std::thread::spawn(move || debounce_loop(raw_rx, file_name, settle_window, tx));

        Ok(Self { _watcher: watcher })
    }
}

fn debounce_loop(
    raw_rx: std_mpsc::Receiver<NotifyEvent>,
    file_name: Option<std::ffi::OsString>,
    settle_window: Duration,
    tx: mpsc::UnboundedSender<()>,
) {
    loop {
        let first = match raw_rx.recv() {
            Ok(event) => event,
            Err(_) => return, // watcher dropped, channel closed
        };
        if !touches_target(&first, file_name.as_deref()) {
            continue;
        }
        // Drain anything else that settles within the window into this
        // single signal rather than waking the caller once per event.
        while raw_rx.recv_timeout(settle_window).is_ok() {}
        if tx.send(()).is_err() {
            return; // receiver dropped, nothing left to notify
        }
    }
}

fn touches_target(event: &NotifyEvent, file_name: Option<&std::ffi::OsStr>) -> bool {
    match file_name {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => true,
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
