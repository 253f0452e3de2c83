// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort local telemetry: one JSONL file per day under
//! `telemetry/`, never load-bearing for recovery. A write failure is
//! logged and swallowed rather than propagated, since losing a telemetry
//! line must never interrupt an edit.

use serde::Serialize;
use std::io::Write as _;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
enum TelemetryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent<'a> {
    pub ts_ms: u64,
    pub event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

pub struct TelemetryLog {
    dir: PathBuf,
}

impl TelemetryLog {
    pub fn new(state_dir: &std::path::Path) -> Self {
        Self { dir: state_dir.join("telemetry") }
    }

    /// Append one event to today's log, keyed by the day the event
    /// belongs to (`ts_ms / 86_400_000`). Any I/O failure is logged and
    /// discarded.
    pub fn record(&self, event: &TelemetryEvent<'_>) {
        if let Err(e) = self.try_record(event) {
            warn!(error = %e, "failed to write telemetry event");
        }
    }

    fn try_record(&self, event: &TelemetryEvent<'_>) -> Result<(), TelemetryError> {
        std::fs::create_dir_all(&self.dir)?;
        let day = event.ts_ms / 86_400_000;
        let path = self.dir.join(format!("{day}.jsonl"));
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&line)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
