// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Session actor: one in-memory buffer for one (window, file) pair.
//!
//! A `Session` never performs I/O. Reading the file at open time,
//! re-reading it to detect an external change, and writing the buffer back
//! out all happen in `edd-daemon`, which hands the already-fetched bytes
//! (or a write callback, for autosave) to the methods here. This keeps the
//! state machine testable without a filesystem and keeps every failable
//! disk operation on the caller's side of the `?`, per the pre-commit
//! discipline described below.
//!
//! All operations on a given `Session` are expected to run one at a time —
//! the daemon serializes access per session, mirroring the handler-per-object
//! discipline its RPC dispatch table uses for every other mutable resource.

use crate::history::{HistoryStore, Snapshot, SnapshotReason};
use crate::ids::{SessionId, SnapshotId};
use crate::revision::Revision;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a [`Session`], returned from every operation and
/// serialized directly into RPC results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub file_url: String,
    pub revision: Revision,
    pub is_dirty: bool,
    pub conflict_snapshot_id: Option<SnapshotId>,
    pub banner_message: Option<String>,
    pub closed: bool,
}

/// Coarse state-machine position, exposed for introspection and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open { dirty: bool },
    Closed,
}

/// Result of [`Session::autosave`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The buffer was already clean; nothing was written.
    NotDirty,
    Saved(SessionInfo),
}

/// Result of [`Session::apply_external_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalChangeOutcome {
    /// The disk revision the caller observed matches what the session
    /// already believes is on disk; no-op.
    Unchanged,
    Applied(SessionInfo),
}

/// One in-memory editor buffer bound to a single file.
#[derive(Debug)]
pub struct Session {
    session_id: SessionId,
    file_url: String,
    content: String,
    disk_revision: Revision,
    is_dirty: bool,
    conflict_snapshot_id: Option<SnapshotId>,
    banner_message: Option<String>,
    history: HistoryStore,
    closed: bool,
}

impl Session {
    /// Construct a freshly opened session from content already read off
    /// disk. `previous_snapshots` is the (pruned) on-disk snapshot log for
    /// this file as it stood *before* this open; if its most recent entry
    /// diverges from `content`, the open is flagged as a recovery (the
    /// history holds content the disk doesn't, most likely because a prior
    /// process died before its last autosave reached disk).
    pub fn open(
        session_id: SessionId,
        file_url: impl Into<String>,
        content: String,
        disk_revision: Revision,
        now_ms: u64,
        history: HistoryStore,
        previous_snapshots: &[Snapshot],
    ) -> Self {
        let (conflict_snapshot_id, banner_message) = match previous_snapshots.last() {
            Some(prev) if prev.content != content => (
                Some(prev.id.clone()),
                Some(
                    "Recovered a previous version of this file that was never saved to disk."
                        .to_string(),
                ),
            ),
            _ => (None, None),
        };

        let mut history = history;
        history.push(Snapshot::new(
            SnapshotId::generate(),
            now_ms,
            SnapshotReason::OpenBuffer,
            content.clone(),
        ));

        Self {
            session_id,
            file_url: file_url.into(),
            content,
            disk_revision,
            is_dirty: false,
            conflict_snapshot_id,
            banner_message,
            history,
            closed: false,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> &Revision {
        &self.disk_revision
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        if self.closed {
            SessionState::Closed
        } else {
            SessionState::Open { dirty: self.is_dirty }
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.clone(),
            file_url: self.file_url.clone(),
            revision: self.disk_revision.clone(),
            is_dirty: self.is_dirty,
            conflict_snapshot_id: self.conflict_snapshot_id.clone(),
            banner_message: self.banner_message.clone(),
            closed: self.closed,
        }
    }

    /// Replace the buffer. Never persists.
    pub fn update_buffer_content(&mut self, text: String) {
        self.content = text;
        self.is_dirty = true;
    }

    /// Flush the buffer to disk via `write`, which performs the actual
    /// atomic write and returns the resulting revision.
    ///
    /// If the buffer isn't dirty this is a no-op and `write` is never
    /// called. On write failure the buffer stays dirty and the error
    /// propagates to the caller; the in-memory snapshot taken just before
    /// the write attempt is retained regardless, since recovery must not
    /// depend on the write having succeeded.
    pub fn autosave<E>(
        &mut self,
        now_ms: u64,
        reason: SnapshotReason,
        write: impl FnOnce(&str) -> Result<Revision, E>,
    ) -> Result<SaveOutcome, E> {
        if !self.is_dirty {
            return Ok(SaveOutcome::NotDirty);
        }

        self.history.push(Snapshot::new(
            SnapshotId::generate(),
            now_ms,
            reason,
            self.content.clone(),
        ));

        let new_revision = write(&self.content)?;

        self.disk_revision = new_revision;
        self.is_dirty = false;
        self.banner_message = None;
        self.conflict_snapshot_id = None;
        Ok(SaveOutcome::Saved(self.info()))
    }

    /// Reconcile with content already re-read from disk.
    ///
    /// Newest-writer-wins: the disk content always replaces the buffer. If
    /// the buffer was dirty, the buffer is preserved first as a recoverable
    /// snapshot rather than silently discarded.
    pub fn apply_external_change(
        &mut self,
        disk_content: String,
        disk_revision: Revision,
        now_ms: u64,
    ) -> ExternalChangeOutcome {
        if disk_revision == self.disk_revision {
            return ExternalChangeOutcome::Unchanged;
        }

        if self.is_dirty {
            let snapshot = Snapshot::new(
                SnapshotId::generate(),
                now_ms,
                SnapshotReason::BeforeExternalApply,
                self.content.clone(),
            );
            self.conflict_snapshot_id = Some(snapshot.id.clone());
            self.history.push(snapshot);
            self.banner_message = Some(
                "File changed externally. Newest version applied. You can restore your \
                 previous buffer."
                    .to_string(),
            );
        }

        self.content = disk_content;
        self.disk_revision = disk_revision;
        self.is_dirty = false;
        ExternalChangeOutcome::Applied(self.info())
    }

    /// Load a retained snapshot's content back into the buffer. Marks the
    /// buffer dirty; the next autosave is what actually persists it.
    pub fn restore_snapshot(&mut self, id: &SnapshotId) -> Option<SessionInfo> {
        let content = self.history.get(id)?.content.clone();
        self.content = content;
        self.is_dirty = true;
        self.conflict_snapshot_id = None;
        self.banner_message = Some("Restored a previous version of this file.".to_string());
        Some(self.info())
    }

    /// Terminal transition. Callers are responsible for resuming any
    /// outstanding close- or revision-waiters registered against this
    /// session's id; `Session` itself holds no waiter state since it has
    /// no async runtime to suspend on.
    pub fn mark_closed(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
