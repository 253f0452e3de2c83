// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration: compiled-in defaults, overridden by a persisted
//! `config.json`, overridden by individual `EDD_*` environment variables.
//!
//! The launcher reads only `socket_path` and `ipc_timeout_ms` from this
//! layer, and must be able to do so even when no daemon is running yet —
//! `load` never requires a live daemon, only the filesystem.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to persist config.json: {0}")]
    Write(#[from] crate::fileio::FileIoError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub socket_path: PathBuf,
    pub debounce_ms: u64,
    pub max_flush_ms: u64,
    pub max_file_bytes: u64,
    pub history_max_count: usize,
    pub history_max_bytes: usize,
    pub snapshot_ttl_days: u64,
    pub snapshot_max_count: usize,
    pub snapshot_max_bytes: usize,
    pub snapshot_max_entry_bytes: usize,
    pub orphan_sweep_interval_secs: u64,
    pub orphan_idle_threshold_secs: u64,
    pub ipc_timeout_ms: u64,
}

impl Config {
    pub fn defaults_for(state_dir: &Path) -> Self {
        Self {
            socket_path: state_dir.join("rpc.sock"),
            debounce_ms: crate::autosave::DEFAULT_DEBOUNCE_MS,
            max_flush_ms: crate::autosave::DEFAULT_MAX_FLUSH_MS,
            max_file_bytes: crate::fileio::DEFAULT_MAX_FILE_BYTES,
            history_max_count: edd_core::HistoryStore::DEFAULT_MAX_COUNT,
            history_max_bytes: edd_core::HistoryStore::DEFAULT_MAX_BYTES,
            snapshot_ttl_days: 14,
            snapshot_max_count: 256,
            snapshot_max_bytes: 1536 * 1024,
            snapshot_max_entry_bytes: 512 * 1024,
            orphan_sweep_interval_secs: 60,
            orphan_idle_threshold_secs: 5 * 60,
            ipc_timeout_ms: crate::env::DEFAULT_IPC_TIMEOUT_MS,
        }
    }

    /// Resolve effective configuration: `EDD_CONFIG` (or
    /// `state_dir/config.json`) as the base, then individual `EDD_*`
    /// overrides layered on top. Persists the effective config back to
    /// disk only the first time (when no config file existed yet).
    pub fn load(state_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = crate::env::config_path_override().unwrap_or_else(|| state_dir.join("config.json"));
        let existed = config_path.exists();

        let mut config = if existed {
            let bytes = std::fs::read(&config_path)?;
            serde_json::from_slice(&bytes)?
        } else {
            Self::defaults_for(state_dir)
        };

        config.apply_env_overrides();

        if !existed {
            config.persist(&config_path)?;
        }

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_u64("EDD_DEBOUNCE_MS") {
            self.debounce_ms = v;
        }
        if let Some(v) = env_u64("EDD_MAX_FLUSH_MS") {
            self.max_flush_ms = v;
        }
        if let Some(v) = env_u64("EDD_MAX_FILE_BYTES") {
            self.max_file_bytes = v;
        }
        self.ipc_timeout_ms = crate::env::ipc_timeout().as_millis() as u64;
    }

    fn persist(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        crate::fileio::write_bytes_atomically(&bytes, path)?;
        Ok(())
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
