// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the end-to-end scenario tests: a throwaway state
//! directory per test plus thin `assert_cmd` wrappers around `ed`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use tempfile::TempDir;

/// Upper bound most of these tests should settle well within; CI machines
/// are slower than a laptop so this is generous rather than tight.
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

pub struct Project {
    dir: TempDir,
    state_dir: PathBuf,
}

impl Project {
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let state_dir = dir.path().join("state");
        std::fs::create_dir_all(&state_dir).expect("create state dir");
        Self { dir, state_dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> &Path {
        &self.state_dir
    }

    /// Write `content` to `rel` under the project root, creating parent
    /// directories as needed, and return the absolute path.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).expect("read file")
    }

    /// An `ed` invocation scoped to this project's state directory.
    pub fn ed(&self) -> Command {
        let mut cmd = Command::cargo_bin("ed").expect("ed binary");
        cmd.env("EDD_STATE_DIR", &self.state_dir).current_dir(self.dir.path());
        cmd
    }

    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_dir.join("daemon.log")).unwrap_or_default()
    }

    pub fn socket_path(&self) -> PathBuf {
        self.state_dir.join("rpc.sock")
    }

    pub fn pid_path(&self) -> PathBuf {
        self.state_dir.join("daemon.pid")
    }
}

/// Poll `condition` every 20 ms until it returns true or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

pub trait CommandExt {
    fn passes(self) -> Assert;
    fn fails(self) -> Assert;
}

impl CommandExt for Command {
    fn passes(mut self) -> Assert {
        self.assert().success()
    }

    fn fails(mut self) -> Assert {
        self.assert().failure()
    }
}

pub trait AssertExt {
    fn stdout(&self) -> String;
    fn stderr(&self) -> String;
    fn stdout_has(self, needle: &str) -> Self;
    fn stderr_has(self, needle: &str) -> Self;
    fn stderr_lacks(self, needle: &str) -> Self;
    fn code_is(self, code: i32) -> Self;
}

impl AssertExt for Assert {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.get_output().stdout).into_owned()
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.get_output().stderr).into_owned()
    }

    fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "expected stdout to contain {needle:?}, got: {}", self.stdout());
        self
    }

    fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "expected stderr to contain {needle:?}, got: {}", self.stderr());
        self
    }

    fn stderr_lacks(self, needle: &str) -> Self {
        assert!(!self.stderr().contains(needle), "expected stderr NOT to contain {needle:?}, got: {}", self.stderr());
        self
    }

    fn code_is(self, code: i32) -> Self {
        self.code(code)
    }
}
