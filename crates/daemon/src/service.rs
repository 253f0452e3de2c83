// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon service: the session map and the RPC handlers bound to it.
//!
//! Holds three maps keyed by `sessionId` (the session object, its bound
//! window, and the reverse path index) plus the waiter maps for
//! `session.wait` and `session.waitForRevision`. Waiters live here, not on
//! `edd_core::Session`, because suspending a caller is a tokio concern and
//! `edd-core` has no async runtime of its own.

use crate::autosave::AutosaveScheduler;
use crate::config::Config;
use crate::fileio;
use crate::snapshot::{SnapshotStore, SnapshotStoreConfig};
use crate::telemetry::{TelemetryEvent, TelemetryLog};
use crate::watcher::{FileWatcher, DEFAULT_SETTLE_WINDOW};
use crate::window::{NullWindowHandle, WindowHandle};
use edd_core::{
    Clock, ExternalChangeOutcome, HistoryStore, Revision, SaveOutcome, Session, SessionId,
    SnapshotReason,
};
use edd_wire::{
    AppErrorCode, AppQuitParams, AppQuitResult, HelloCapabilities, HelloParams, HelloResult,
    RpcError, SessionCloseParams, SessionCloseResult, SessionOpenParams, SessionOpenResult,
    SessionReloadParams, SessionReloadResult, SessionSaveParams, SessionSaveResult,
    SessionWaitForRevisionParams, SessionWaitForRevisionResult, SessionWaitParams,
    SessionWaitResult, WaitReason,
};
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MIN_SUPPORTED_PROTOCOL_VERSION: u32 = 1;

const RECYCLE_POOL_CAP: usize = 4;
const REVISION_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
enum RevisionSignal {
    Changed { content: String, revision: Revision },
    Closed,
}

struct SessionEntry {
    session: AsyncMutex<Session>,
    window: SyncMutex<Box<dyn WindowHandle>>,
    autosave: AutosaveScheduler,
    _watcher: FileWatcher,
    path: PathBuf,
    last_touch_ms: AtomicU64,
}

/// Session map, waiter registries, and the handlers for every wire method.
pub struct DaemonService<C: Clock> {
    config: Config,
    clock: C,
    snapshot_store: Arc<SnapshotStore>,
    telemetry: TelemetryLog,
    sessions: SyncMutex<HashMap<SessionId, Arc<SessionEntry>>>,
    path_index: SyncMutex<HashMap<PathBuf, SessionId>>,
    close_waiters: SyncMutex<HashMap<SessionId, Vec<(u64, oneshot::Sender<WaitReason>)>>>,
    revision_waiters: SyncMutex<HashMap<SessionId, Vec<(u64, oneshot::Sender<RevisionSignal>)>>>,
    recycle_pool: SyncMutex<Vec<Box<dyn WindowHandle>>>,
    shutdown: tokio::sync::Notify,
    waiter_seq: AtomicU64,
}

impl DaemonService<edd_core::SystemClock> {
    pub fn new(state_dir: PathBuf, config: Config) -> Result<Arc<Self>, ServiceError> {
        Self::with_clock(state_dir, config, edd_core::SystemClock)
    }
}

impl<C: Clock + 'static> DaemonService<C> {
    pub fn with_clock(state_dir: PathBuf, config: Config, clock: C) -> Result<Arc<Self>, ServiceError> {
        let recovery_dir = state_dir.join("recovery");
        std::fs::create_dir_all(&recovery_dir)?;
        let snapshot_store = Arc::new(SnapshotStore::new(
            recovery_dir,
            SnapshotStoreConfig {
                ttl: Duration::from_secs(config.snapshot_ttl_days * 24 * 60 * 60),
                max_count: config.snapshot_max_count,
                max_bytes: config.snapshot_max_bytes,
                max_entry_bytes: config.snapshot_max_entry_bytes,
            },
        ));

        let telemetry = TelemetryLog::new(&state_dir);
        Ok(Arc::new(Self {
            config,
            clock,
            snapshot_store,
            telemetry,
            sessions: SyncMutex::new(HashMap::new()),
            path_index: SyncMutex::new(HashMap::new()),
            close_waiters: SyncMutex::new(HashMap::new()),
            revision_waiters: SyncMutex::new(HashMap::new()),
            recycle_pool: SyncMutex::new(Vec::new()),
            shutdown: tokio::sync::Notify::new(),
            waiter_seq: AtomicU64::new(0),
        }))
    }

    /// Resolves once `app.quit` has flushed every session. The listener
    /// awaits this to know when to stop accepting connections and exit.
    pub async fn wait_for_quit(&self) {
        self.shutdown.notified().await;
    }

    /// Start the background task that reclaims sessions whose window has
    /// died and which haven't been touched in a while.
    pub fn spawn_orphan_sweep(self: &Arc<Self>) {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(service.config.orphan_sweep_interval_secs.max(1)));
            loop {
                ticker.tick().await;
                service.sweep_orphans().await;
            }
        });
    }

    pub fn hello(&self, params: HelloParams) -> HelloResult {
        debug!(client = %params.client, "hello");
        HelloResult {
            protocol_version: PROTOCOL_VERSION,
            capabilities: HelloCapabilities {
                supports_wait: true,
                supports_agent_draft: false,
                supports_quit: true,
            },
            server_pid: std::process::id(),
        }
    }

    pub async fn session_open(self: &Arc<Self>, params: SessionOpenParams) -> Result<SessionOpenResult, RpcError> {
        if let Some(client_version) = params.protocol_version {
            if client_version < MIN_SUPPORTED_PROTOCOL_VERSION {
                return Err(RpcError::application(
                    AppErrorCode::ProtocolVersionTooOld,
                    format!(
                        "client protocol version {client_version} is older than the minimum supported {MIN_SUPPORTED_PROTOCOL_VERSION}"
                    ),
                ));
            }
        }

        let path = normalize_path(&params.path, params.cwd.as_deref());

        if let Some(entry) = self.find_live_entry(&path) {
            entry.window.lock().focus();
            let session = entry.session.lock().await;
            let info = session.info();
            entry.last_touch_ms.store(self.clock.epoch_ms(), Ordering::SeqCst);
            info!(session_id = %info.session_id, path = %path.display(), "reusing live session");
            return Ok(SessionOpenResult {
                session_id: info.session_id,
                path: path.to_string_lossy().into_owned(),
                content: session.content().to_string(),
                revision: info.revision,
                is_dirty: info.is_dirty,
            });
        }

        if let Some(stale_session_id) = self.path_index.lock().remove(&path) {
            self.discard_session(&stale_session_id);
        }

        let now = self.clock.epoch_ms();
        fileio::ensure_file_exists(&path).map_err(|e| RpcError::internal(e.to_string()))?;
        let content = fileio::read_text(&path, self.config.max_file_bytes).map_err(|e| match e {
            fileio::FileIoError::FileTooLarge { size, cap, .. } => RpcError::application(
                AppErrorCode::FileTooLarge,
                format!("{size} bytes exceeds the {cap} byte cap"),
            ),
            other => RpcError::internal(other.to_string()),
        })?;
        let disk_revision = Revision::of(&content);

        let previous_snapshots = self.snapshot_store.load(&path, now).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load recovery log, treating as empty");
            Vec::new()
        });
        if let Err(e) = self.snapshot_store.append(&path, SnapshotReason::OpenBuffer, &content, now) {
            warn!(error = %e, "failed to append open-buffer recovery snapshot");
        }

        let session_id = SessionId::generate();
        let history = HistoryStore::new(self.config.history_max_count, self.config.history_max_bytes);
        let session = Session::open(
            session_id.clone(),
            params.path.clone(),
            content.clone(),
            disk_revision.clone(),
            now,
            history,
            &previous_snapshots,
        );
        let info = session.info();

        let window = self.take_or_create_window();
        let watcher = self.spawn_watcher(&session_id, &path)?;
        let autosave = self.spawn_autosave(&session_id);

        let entry = Arc::new(SessionEntry {
            session: AsyncMutex::new(session),
            window: SyncMutex::new(window),
            autosave,
            _watcher: watcher,
            path: path.clone(),
            last_touch_ms: AtomicU64::new(now),
        });

        self.sessions.lock().insert(session_id.clone(), entry);
        self.path_index.lock().insert(path.clone(), session_id.clone());

        self.telemetry.record(&TelemetryEvent {
            ts_ms: now,
            event: "session.open",
            session_id: Some(session_id.as_str()),
            duration_ms: None,
        });
        info!(session_id = %session_id, path = %path.display(), "opened session");
        Ok(SessionOpenResult {
            session_id,
            path: path.to_string_lossy().into_owned(),
            content,
            revision: disk_revision,
            is_dirty: info.is_dirty,
        })
    }

    pub async fn session_reload(self: &Arc<Self>, params: SessionReloadParams) -> Result<SessionReloadResult, RpcError> {
        let entry = self.require_entry(&params.session_id)?;
        self.touch(&params.session_id);
        self.handle_external_signal(&params.session_id).await;

        let session = entry.session.lock().await;
        if session.is_closed() {
            return Err(RpcError::application(AppErrorCode::SessionClosed, "session is closed"));
        }
        Ok(SessionReloadResult { content: session.content().to_string(), revision: session.revision().clone() })
    }

    pub async fn session_save(self: &Arc<Self>, params: SessionSaveParams) -> Result<SessionSaveResult, RpcError> {
        let entry = self.require_entry(&params.session_id)?;
        self.touch(&params.session_id);

        let now = self.clock.epoch_ms();
        let mut session = entry.session.lock().await;
        if session.is_closed() {
            return Err(RpcError::application(AppErrorCode::SessionClosed, "session is closed"));
        }

        if let Some(base_revision) = &params.base_revision {
            if !params.force && base_revision != session.revision() {
                return Ok(SessionSaveResult { ok: false, revision: session.revision().clone() });
            }
        }

        session.update_buffer_content(params.content);
        entry.autosave.touch();
        let content_snapshot = session.content().to_string();
        if let Err(e) = self.snapshot_store.append(&entry.path, SnapshotReason::Autosave, &content_snapshot, now) {
            warn!(error = %e, "failed to append on-disk save snapshot");
        }

        let path = entry.path.clone();
        let outcome = session
            .autosave(now, SnapshotReason::Autosave, |text| fileio::write_text_atomically(text, &path))
            .map_err(|e: fileio::FileIoError| RpcError::internal(e.to_string()))?;

        match outcome {
            SaveOutcome::Saved(info) => {
                drop(session);
                self.resolve_revision_waiters(
                    &params.session_id,
                    RevisionSignal::Changed { content: content_snapshot, revision: info.revision.clone() },
                );
                info!(session_id = %params.session_id, "saved session");
                Ok(SessionSaveResult { ok: true, revision: info.revision })
            }
            SaveOutcome::NotDirty => {
                let revision = session.revision().clone();
                Ok(SessionSaveResult { ok: true, revision })
            }
        }
    }

    pub async fn session_wait_for_revision(
        self: &Arc<Self>,
        params: SessionWaitForRevisionParams,
    ) -> Result<SessionWaitForRevisionResult, RpcError> {
        let entry = self.require_entry(&params.session_id)?;
        {
            let session = entry.session.lock().await;
            if session.is_closed() {
                return Err(RpcError::application(AppErrorCode::SessionClosed, "session is closed"));
            }
            if session.revision() != &params.base_revision {
                return Ok(SessionWaitForRevisionResult {
                    content: session.content().to_string(),
                    revision: session.revision().clone(),
                    changed: true,
                });
            }
        }

        let (tx, rx) = oneshot::channel();
        let waiter_id = self.waiter_seq.fetch_add(1, Ordering::Relaxed);
        self.revision_waiters.lock().entry(params.session_id.clone()).or_default().push((waiter_id, tx));

        let timeout = Duration::from_millis(params.timeout_ms.unwrap_or(self.config.ipc_timeout_ms));
        let deadline = tokio::time::Instant::now() + timeout;
        let mut poll = tokio::time::interval(REVISION_POLL_INTERVAL);

        tokio::pin!(rx);
        loop {
            tokio::select! {
                result = &mut rx => {
                    return Ok(match result {
                        Ok(RevisionSignal::Changed { content, revision }) => {
                            let changed = revision != params.base_revision;
                            SessionWaitForRevisionResult { content, revision, changed }
                        }
                        Ok(RevisionSignal::Closed) | Err(_) => {
                            let session = entry.session.lock().await;
                            SessionWaitForRevisionResult {
                                content: session.content().to_string(),
                                revision: session.revision().clone(),
                                changed: false,
                            }
                        }
                    });
                }
                _ = poll.tick() => {
                    self.handle_external_signal(&params.session_id).await;
                    let session = entry.session.lock().await;
                    if session.revision() != &params.base_revision {
                        return Ok(SessionWaitForRevisionResult {
                            content: session.content().to_string(),
                            revision: session.revision().clone(),
                            changed: true,
                        });
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    self.remove_revision_waiter(&params.session_id, waiter_id);
                    let session = entry.session.lock().await;
                    return Ok(SessionWaitForRevisionResult {
                        content: session.content().to_string(),
                        revision: session.revision().clone(),
                        changed: false,
                    });
                }
            }
        }
    }

    pub async fn session_wait(self: &Arc<Self>, params: SessionWaitParams) -> Result<SessionWaitResult, RpcError> {
        let entry = self.require_entry(&params.session_id)?;
        {
            let session = entry.session.lock().await;
            if session.is_closed() {
                return Ok(SessionWaitResult { reason: WaitReason::UserClosed });
            }
        }

        let (tx, rx) = oneshot::channel();
        let waiter_id = self.waiter_seq.fetch_add(1, Ordering::Relaxed);
        self.close_waiters.lock().entry(params.session_id.clone()).or_default().push((waiter_id, tx));

        let timeout = Duration::from_millis(params.timeout_ms.unwrap_or(self.config.ipc_timeout_ms));
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reason)) => Ok(SessionWaitResult { reason }),
            _ => {
                self.remove_close_waiter(&params.session_id, waiter_id);
                Ok(SessionWaitResult { reason: WaitReason::Timeout })
            }
        }
    }

    pub async fn session_close(self: &Arc<Self>, params: SessionCloseParams) -> Result<SessionCloseResult, RpcError> {
        let entry = self.require_entry(&params.session_id)?;

        entry.autosave.flush_now().await;
        entry.session.lock().await.mark_closed();

        self.sessions.lock().remove(&params.session_id);
        self.path_index.lock().retain(|_, sid| sid != &params.session_id);

        self.resolve_revision_waiters(&params.session_id, RevisionSignal::Closed);
        self.resolve_close_waiters(&params.session_id, WaitReason::UserClosed);

        let window = {
            let mut guard = entry.window.lock();
            std::mem::replace(&mut *guard, Box::<NullWindowHandle>::default())
        };
        self.recycle_window(window);

        self.telemetry.record(&TelemetryEvent {
            ts_ms: self.clock.epoch_ms(),
            event: "session.close",
            session_id: Some(params.session_id.as_str()),
            duration_ms: None,
        });
        info!(session_id = %params.session_id, "closed session");
        Ok(SessionCloseResult { ok: true })
    }

    pub async fn app_quit(self: &Arc<Self>, _params: AppQuitParams) -> Result<AppQuitResult, RpcError> {
        let entries: Vec<Arc<SessionEntry>> = self.sessions.lock().values().cloned().collect();
        for entry in &entries {
            entry.autosave.flush_now().await;
            entry.session.lock().await.mark_closed();
        }

        let session_ids: Vec<SessionId> = self.sessions.lock().keys().cloned().collect();
        for session_id in &session_ids {
            self.resolve_revision_waiters(session_id, RevisionSignal::Closed);
            self.resolve_close_waiters(session_id, WaitReason::UserClosed);
        }

        self.sessions.lock().clear();
        self.path_index.lock().clear();
        self.telemetry.record(&TelemetryEvent {
            ts_ms: self.clock.epoch_ms(),
            event: "app.quit",
            session_id: None,
            duration_ms: None,
        });
        info!("daemon shutting down");
        self.shutdown.notify_waiters();
        Ok(AppQuitResult { ok: true })
    }

    async fn sweep_orphans(self: &Arc<Self>) {
        let now = self.clock.epoch_ms();
        let idle_threshold_ms = self.config.orphan_idle_threshold_secs.saturating_mul(1000);

        let candidates: Vec<SessionId> = {
            let sessions = self.sessions.lock();
            sessions
                .iter()
                .filter(|(_, entry)| {
                    let window_dead = !entry.window.lock().is_alive();
                    let idle = now.saturating_sub(entry.last_touch_ms.load(Ordering::SeqCst)) > idle_threshold_ms;
                    window_dead && idle
                })
                .map(|(id, _)| id.clone())
                .collect()
        };

        for session_id in candidates {
            info!(session_id = %session_id, "sweeping orphaned session");
            if let Some(entry) = self.get_entry(&session_id) {
                entry.autosave.flush_now().await;
                entry.session.lock().await.mark_closed();
            }
            self.sessions.lock().remove(&session_id);
            self.path_index.lock().retain(|_, sid| sid != &session_id);
            self.resolve_revision_waiters(&session_id, RevisionSignal::Closed);
            self.resolve_close_waiters(&session_id, WaitReason::UserClosed);
        }
    }

    async fn autosave_flush(self: Arc<Self>, session_id: SessionId) {
        let Some(entry) = self.get_entry(&session_id) else { return };
        let now = self.clock.epoch_ms();
        let mut session = entry.session.lock().await;
        if !session.is_dirty() {
            return;
        }

        let content_snapshot = session.content().to_string();
        if let Err(e) = self.snapshot_store.append(&entry.path, SnapshotReason::Autosave, &content_snapshot, now) {
            warn!(error = %e, "failed to append on-disk autosave snapshot");
        }

        let path = entry.path.clone();
        let result = session.autosave(now, SnapshotReason::Autosave, |text| fileio::write_text_atomically(text, &path));
        match result {
            Ok(SaveOutcome::Saved(info)) => {
                drop(session);
                self.resolve_revision_waiters(
                    &session_id,
                    RevisionSignal::Changed { content: content_snapshot, revision: info.revision },
                );
            }
            Ok(SaveOutcome::NotDirty) => {}
            Err(err) => {
                warn!(error = %err, session_id = %session_id, "autosave flush failed, buffer left dirty");
            }
        }
    }

    async fn handle_external_signal(self: &Arc<Self>, session_id: &SessionId) {
        let Some(entry) = self.get_entry(session_id) else { return };
        let disk_content = match fileio::read_text(&entry.path, self.config.max_file_bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, session_id = %session_id, "watcher re-read failed");
                return;
            }
        };
        let disk_revision = Revision::of(&disk_content);
        let now = self.clock.epoch_ms();

        let mut session = entry.session.lock().await;
        if session.is_closed() {
            return;
        }
        let outcome = session.apply_external_change(disk_content.clone(), disk_revision.clone(), now);
        drop(session);

        if matches!(outcome, ExternalChangeOutcome::Applied(_)) {
            self.resolve_revision_waiters(
                session_id,
                RevisionSignal::Changed { content: disk_content, revision: disk_revision },
            );
        }
    }

    fn spawn_watcher(self: &Arc<Self>, session_id: &SessionId, path: &Path) -> Result<FileWatcher, RpcError> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let watcher =
            FileWatcher::spawn(path.to_path_buf(), DEFAULT_SETTLE_WINDOW, tx).map_err(|e| RpcError::internal(e.to_string()))?;

        let service = self.clone();
        let sid = session_id.clone();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                service.handle_external_signal(&sid).await;
            }
        });

        Ok(watcher)
    }

    fn spawn_autosave(self: &Arc<Self>, session_id: &SessionId) -> AutosaveScheduler {
        let service = self.clone();
        let sid = session_id.clone();
        AutosaveScheduler::spawn(
            Duration::from_millis(self.config.debounce_ms),
            Duration::from_millis(self.config.max_flush_ms),
            move || {
                let service = service.clone();
                let sid = sid.clone();
                async move { service.autosave_flush(sid).await }
            },
        )
    }

    fn find_live_entry(&self, path: &Path) -> Option<Arc<SessionEntry>> {
        let session_id = self.path_index.lock().get(path).cloned()?;
        let entry = self.get_entry(&session_id)?;
        if entry.window.lock().is_alive() {
            Some(entry)
        } else {
            None
        }
    }

    fn take_or_create_window(&self) -> Box<dyn WindowHandle> {
        let mut pool = self.recycle_pool.lock();
        while let Some(window) = pool.pop() {
            if window.is_alive() {
                return window;
            }
        }
        Box::new(NullWindowHandle::new())
    }

    fn recycle_window(&self, mut window: Box<dyn WindowHandle>) {
        let mut pool = self.recycle_pool.lock();
        if !window.is_alive() || pool.len() >= RECYCLE_POOL_CAP {
            window.close();
            return;
        }
        pool.push(window);
    }

    fn discard_session(&self, session_id: &SessionId) {
        if self.sessions.lock().remove(session_id).is_some() {
            self.resolve_revision_waiters(session_id, RevisionSignal::Closed);
            self.resolve_close_waiters(session_id, WaitReason::UserClosed);
        }
    }

    fn get_entry(&self, session_id: &SessionId) -> Option<Arc<SessionEntry>> {
        self.sessions.lock().get(session_id).cloned()
    }

    fn require_entry(&self, session_id: &SessionId) -> Result<Arc<SessionEntry>, RpcError> {
        self.get_entry(session_id)
            .ok_or_else(|| RpcError::application(AppErrorCode::SessionNotFound, format!("no such session: {session_id}")))
    }

    fn touch(&self, session_id: &SessionId) {
        if let Some(entry) = self.get_entry(session_id) {
            entry.last_touch_ms.store(self.clock.epoch_ms(), Ordering::SeqCst);
        }
    }

    fn resolve_revision_waiters(&self, session_id: &SessionId, signal: RevisionSignal) {
        if let Some(senders) = self.revision_waiters.lock().remove(session_id) {
            for (_, tx) in senders {
                let _ = tx.send(signal.clone());
            }
        }
    }

    fn resolve_close_waiters(&self, session_id: &SessionId, reason: WaitReason) {
        if let Some(senders) = self.close_waiters.lock().remove(session_id) {
            for (_, tx) in senders {
                let _ = tx.send(reason);
            }
        }
    }

    /// Drop a single timed-out revision waiter from the registry so a
    /// session that's long-polled repeatedly with no intervening save or
    /// close doesn't accumulate one dead `Sender` per call.
    fn remove_revision_waiter(&self, session_id: &SessionId, waiter_id: u64) {
        let mut waiters = self.revision_waiters.lock();
        if let Some(senders) = waiters.get_mut(session_id) {
            senders.retain(|(id, _)| *id != waiter_id);
            if senders.is_empty() {
                waiters.remove(session_id);
            }
        }
    }

    /// Mirror of [`Self::remove_revision_waiter`] for `session.wait`.
    fn remove_close_waiter(&self, session_id: &SessionId, waiter_id: u64) {
        let mut waiters = self.close_waiters.lock();
        if let Some(senders) = waiters.get_mut(session_id) {
            senders.retain(|(id, _)| *id != waiter_id);
            if senders.is_empty() {
                waiters.remove(session_id);
            }
        }
    }
}

fn normalize_path(path: &str, cwd: Option<&str>) -> PathBuf {
    let candidate = PathBuf::from(path);
    let joined = if candidate.is_absolute() {
        candidate
    } else {
        let base = cwd.map(PathBuf::from).unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        base.join(candidate)
    };
    clean(joined)
}

fn clean(path: PathBuf) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
