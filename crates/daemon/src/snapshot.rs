// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-file, on-disk snapshot log used for crash recovery.
//!
//! One append-only JSON array per watched file, stored at
//! `recovery/<sha256(path)>.json` so renaming or moving the edited file
//! doesn't orphan its recovery history. Pruned on every read and write.
//! Grounded on `storage/snapshot.rs`'s backup-rotation discipline, adapted
//! from "one WAL snapshot per daemon" to "one recovery log per file".

use edd_core::{Snapshot, SnapshotId, SnapshotReason};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt recovery log: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot of {0} bytes exceeds the {1} byte per-entry cap")]
    EntryTooLarge(usize, usize),
}

#[derive(Debug, Clone)]
pub struct SnapshotStoreConfig {
    pub ttl: Duration,
    pub max_count: usize,
    pub max_bytes: usize,
    pub max_entry_bytes: usize,
}

impl Default for SnapshotStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(14 * 24 * 60 * 60),
            max_count: 256,
            max_bytes: 1536 * 1024,
            max_entry_bytes: 512 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    id: String,
    created_at_ms: u64,
    reason: String,
    content: String,
    content_hash: String,
}

impl StoredEntry {
    fn byte_weight(&self) -> usize {
        self.content.len()
    }
}

fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().fold(String::with_capacity(digest.len() * 2), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

fn reason_str(reason: SnapshotReason) -> &'static str {
    reason.as_str()
}

fn parse_reason(tag: &str) -> SnapshotReason {
    match tag {
        "open_buffer" => SnapshotReason::OpenBuffer,
        "before_external_apply" => SnapshotReason::BeforeExternalApply,
        "app_hide" => SnapshotReason::AppHide,
        _ => SnapshotReason::Autosave,
    }
}

/// Derive the on-disk log path for a given edited file's canonical path.
pub fn log_path_for(recovery_dir: &Path, file_path: &Path) -> PathBuf {
    let digest = Sha256::digest(file_path.to_string_lossy().as_bytes());
    let hex = digest.iter().fold(String::with_capacity(digest.len() * 2), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    });
    recovery_dir.join(format!("{hex}.json"))
}

/// Per-file snapshot log store. All operations across all files are
/// serialized by a single process-wide mutex; I/O cost is low compared to
/// the correctness benefit of never interleaving two writers on the same
/// log.
pub struct SnapshotStore {
    recovery_dir: PathBuf,
    config: SnapshotStoreConfig,
    lock: parking_lot::Mutex<()>,
}

impl SnapshotStore {
    pub fn new(recovery_dir: PathBuf, config: SnapshotStoreConfig) -> Self {
        Self { recovery_dir, config, lock: parking_lot::Mutex::new(()) }
    }

    /// Load this file's pruned snapshot log, oldest first.
    pub fn load(&self, file_path: &Path, now_ms: u64) -> Result<Vec<Snapshot>, SnapshotStoreError> {
        let _guard = self.lock.lock();
        let entries = self.read_pruned(file_path, now_ms)?;
        Ok(entries
            .into_iter()
            .map(|e| {
                Snapshot::new(
                    SnapshotId::from(e.id),
                    e.created_at_ms,
                    parse_reason(&e.reason),
                    e.content,
                )
            })
            .collect())
    }

    /// Append a snapshot, pruning before and after. A content hash equal to
    /// the log's last entry is a de-duplicating no-op that returns the
    /// existing id.
    pub fn append(
        &self,
        file_path: &Path,
        reason: SnapshotReason,
        content: &str,
        now_ms: u64,
    ) -> Result<SnapshotId, SnapshotStoreError> {
        if content.len() > self.config.max_entry_bytes {
            return Err(SnapshotStoreError::EntryTooLarge(content.len(), self.config.max_entry_bytes));
        }

        let _guard = self.lock.lock();
        let mut entries = self.read_pruned(file_path, now_ms)?;

        let hash = content_hash(content);
        if let Some(last) = entries.last() {
            if last.content_hash == hash {
                return Ok(SnapshotId::from(last.id.clone()));
            }
        }

        let id = SnapshotId::generate();
        entries.push(StoredEntry {
            id: id.as_str().to_string(),
            created_at_ms: now_ms,
            reason: reason_str(reason).to_string(),
            content: content.to_string(),
            content_hash: hash,
        });

        let entries = prune(entries, &self.config, now_ms);
        self.write(file_path, &entries)?;
        Ok(id)
    }

    fn read_pruned(&self, file_path: &Path, now_ms: u64) -> Result<Vec<StoredEntry>, SnapshotStoreError> {
        let path = log_path_for(&self.recovery_dir, file_path);
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let pruned = prune(entries, &self.config, now_ms);
        Ok(pruned)
    }

    fn write(&self, file_path: &Path, entries: &[StoredEntry]) -> Result<(), SnapshotStoreError> {
        let path = log_path_for(&self.recovery_dir, file_path);
        std::fs::create_dir_all(&self.recovery_dir)?;
        let bytes = serde_json::to_vec(entries)?;
        crate::fileio::write_bytes_atomically(&bytes, &path)?;
        Ok(())
    }
}

fn prune(mut entries: Vec<StoredEntry>, config: &SnapshotStoreConfig, now_ms: u64) -> Vec<StoredEntry> {
    let ttl_ms = config.ttl.as_millis() as u64;
    entries.retain(|e| now_ms.saturating_sub(e.created_at_ms) <= ttl_ms);

    if entries.len() > config.max_count {
        let drop = entries.len() - config.max_count;
        entries.drain(0..drop);
    }

    let mut total: usize = entries.iter().map(StoredEntry::byte_weight).sum();
    while total > config.max_bytes && !entries.is_empty() {
        let removed = entries.remove(0);
        total = total.saturating_sub(removed.byte_weight());
    }

    entries
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
