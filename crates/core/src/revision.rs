// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-identity revisions.
//!
//! A [`Revision`] is a deterministic fingerprint of a buffer's UTF-8 bytes.
//! It is never a version counter: two edits that happen to produce
//! byte-identical content always carry the same revision, and there is no
//! way to derive "newer than" from a revision alone — only "same content
//! as" or "different content than".

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smol_str::SmolStr;
use std::fmt;

/// `sha256:<hex>` fingerprint of a buffer's UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(SmolStr);

impl Revision {
    /// Compute the revision of `text`.
    ///
    /// Total and deterministic: every `&str` has exactly one revision, and
    /// the same bytes always produce the same revision regardless of when
    /// or how many times this is called.
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        let mut out = String::with_capacity(7 + digest.len() * 2);
        out.push_str("sha256:");
        for byte in digest {
            use std::fmt::Write;
            let _ = write!(out, "{byte:02x}");
        }
        Self(SmolStr::new(out))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Revision> for String {
    fn from(r: Revision) -> Self {
        r.0.to_string()
    }
}

#[cfg(test)]
#[path = "revision_tests.rs"]
mod tests;
