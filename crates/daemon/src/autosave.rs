// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session autosave scheduler: debounce with a hard latency cap.
//!
//! Every buffer edit calls [`AutosaveScheduler::touch`]. A flush fires
//! `debounce` after the *last* touch, but no later than `max_flush` after
//! the *first* touch in a burst — a session that is edited continuously
//! still gets saved periodically instead of starving the debounce forever.
//! Window close, app hide, resign-active, and app quit all need a
//! synchronous flush before they tear the session down; [`flush_now`] is an
//! `async fn` the caller awaits directly, not a detached task, so a forced
//! flush is guaranteed to complete before its caller proceeds.

use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

enum Command {
    Touch,
    FlushNow(oneshot::Sender<()>),
    Stop,
}

pub struct AutosaveScheduler {
    tx: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
}

impl AutosaveScheduler {
    /// Spawn a scheduler that calls `flush` whenever a debounced or
    /// latency-capped autosave is due.
    pub fn spawn<F, Fut>(debounce: Duration, max_flush: Duration, flush: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(rx, debounce, max_flush, flush));
        Self { tx, task: Some(task) }
    }

    /// Record a buffer edit, (re)starting the debounce window.
    pub fn touch(&self) {
        let _ = self.tx.send(Command::Touch);
    }

    /// Force an immediate flush and wait for it to complete. Used on
    /// window close, app hide, resign-active, and app quit.
    pub async fn flush_now(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::FlushNow(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Stop the scheduler, flushing first if an edit is still pending.
    pub async fn stop(mut self) {
        let _ = self.tx.send(Command::Stop);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Stop);
    }
}

async fn run_loop<F, Fut>(
    mut rx: mpsc::UnboundedReceiver<Command>,
    debounce: Duration,
    max_flush: Duration,
    flush: F,
) where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut pending_since: Option<Instant> = None;
    let mut last_touch: Option<Instant> = None;

    loop {
        let sleep_for = match (pending_since, last_touch) {
            (Some(since), Some(last)) => {
                let debounce_remaining = debounce.saturating_sub(last.elapsed());
                let max_remaining = max_flush.saturating_sub(since.elapsed());
                Some(debounce_remaining.min(max_remaining))
            }
            _ => None,
        };

        let timer = async {
            match sleep_for {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            cmd = rx.recv() => {
                match cmd {
                    None => return,
                    Some(Command::Touch) => {
                        let now = Instant::now();
                        pending_since.get_or_insert(now);
                        last_touch = Some(now);
                    }
                    Some(Command::FlushNow(ack)) => {
                        flush().await;
                        pending_since = None;
                        last_touch = None;
                        let _ = ack.send(());
                    }
                    Some(Command::Stop) => {
                        if pending_since.is_some() {
                            flush().await;
                        }
                        return;
                    }
                }
            }
            _ = timer => {
                flush().await;
                pending_since = None;
                last_touch = None;
            }
        }
    }
}

pub const DEFAULT_DEBOUNCE_MS: u64 = 50;
pub const DEFAULT_MAX_FLUSH_MS: u64 = 250;

#[cfg(test)]
#[path = "autosave_tests.rs"]
mod tests;
