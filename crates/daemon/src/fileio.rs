// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic, size-capped file I/O for editor buffers.
//!
//! The write path goes through a same-directory temp file plus a rename so
//! a reader never observes a partial write and a crash mid-write leaves the
//! previous version of the file intact.

use edd_core::Revision;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
    #[error("{path} is {size} bytes, over the {cap} byte cap")]
    FileTooLarge { path: PathBuf, size: u64, cap: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read `path` as UTF-8 text, bounded by `max_bytes`.
///
/// If the file doesn't exist, returns an empty string — callers that need
/// "create on open" semantics create the file themselves first. Invalid
/// UTF-8 sequences are replaced rather than rejected: a text editor must be
/// able to open *something*.
pub fn read_text(path: &Path, max_bytes: u64) -> Result<String, FileIoError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(String::new());
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(FileIoError::NotAFile(path.to_path_buf()));
    }
    if metadata.len() > max_bytes {
        return Err(FileIoError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            cap: max_bytes,
        });
    }

    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Ensure a regular, possibly-empty file exists at `path`, creating parent
/// directories as needed. A no-op if the file already exists.
pub fn ensure_file_exists(path: &Path) -> Result<(), FileIoError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
    Ok(())
}

/// Write `text` to `path` atomically and return the resulting revision.
pub fn write_text_atomically(text: &str, path: &Path) -> Result<Revision, FileIoError> {
    write_bytes_atomically(text.as_bytes(), path)?;
    Ok(Revision::of(text))
}

/// Write `bytes` to `path` via a same-directory temp file plus rename,
/// preserving the target's existing permissions if it had any.
pub fn write_bytes_atomically(bytes: &[u8], path: &Path) -> Result<(), FileIoError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let permissions = std::fs::metadata(path).ok().map(|m| m.permissions());

    let unique = nanoid::nanoid!(8);
    let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or("buffer");
    let tmp_path = parent.join(format!(".{basename}.tmp.{unique}"));

    {
        let mut tmp_file = std::fs::File::create(&tmp_path)?;
        tmp_file.write_all(bytes)?;
        tmp_file.sync_all()?;
    }

    if let Some(perms) = permissions {
        std::fs::set_permissions(&tmp_path, perms)?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "fileio_tests.rs"]
mod tests;
