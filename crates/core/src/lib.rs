// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! edd-core: session and revision model for the edd editor daemon.
//!
//! This crate has no I/O of its own — reading/writing files, watching
//! directories, and persisting snapshots to disk all live in `edd-daemon`.
//! What lives here is the pure state machine: a [`Session`] owns one file's
//! in-memory buffer plus the bookkeeping (`revision`, `isDirty`, conflict
//! marker, bounded history, waiters) needed to answer every RPC in the wire
//! protocol without touching the filesystem itself.

pub mod clock;
pub mod history;
pub mod ids;
pub mod revision;
pub mod session;

pub use clock::{Clock, FakeClock, SystemClock};
pub use history::{HistoryStore, Snapshot, SnapshotReason};
pub use ids::{SessionId, SnapshotId};
pub use revision::Revision;
pub use session::{
    ExternalChangeOutcome, Session, SessionInfo, SessionState, SaveOutcome,
};
