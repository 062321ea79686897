// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Test utilities for codewise pipeline tests
//!
//! This module provides utilities for:
//! - Temporary directory management
//! - Git repository scaffolding for tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Temporary Directory Management
// ============================================================================

/// Counter for generating unique test directory names
static TEST_DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A temporary directory that is automatically cleaned up when dropped
pub struct TempTestDir {
    path: PathBuf,
}

impl TempTestDir {
    /// Create a new, unique temporary test directory
    pub fn new(test_name: &str) -> Self {
        let counter = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir_name = format!(
            "codewise-test-{}-{}-{}",
            test_name,
            std::process::id(),
            counter
        );
        let path = std::env::temp_dir().join(dir_name);
        fs::create_dir_all(&path).expect("Failed to create temp test directory");
        Self { path }
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file within the temp directory with the given content
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }
}

impl Drop for TempTestDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

// ============================================================================
// Git Repository Scaffolding
// ============================================================================

/// A temporary git repository on branch `main`
pub struct TestGitRepo {
    temp_dir: TempTestDir,
}

impl TestGitRepo {
    /// Create and initialize a repository with a local identity
    pub fn new(test_name: &str) -> Self {
        let temp_dir = TempTestDir::new(test_name);
        let path = temp_dir.path();
        run_git(path, &["init", "--quiet"]);
        run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(path, &["config", "user.email", "test@example.com"]);
        run_git(path, &["config", "user.name", "Test Author"]);
        run_git(path, &["config", "commit.gpgsign", "false"]);
        Self { temp_dir }
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file without staging it
    pub fn write_file(&self, relative_path: &str, content: &str) -> &Self {
        self.temp_dir.create_file(relative_path, content);
        self
    }

    /// Create a file and stage it
    pub fn create_file(&self, relative_path: &str, content: &str) -> &Self {
        self.temp_dir.create_file(relative_path, content);
        run_git(self.path(), &["add", relative_path]);
        self
    }

    /// Create a commit with the given message
    pub fn commit(&self, message: &str) -> String {
        run_git(self.path(), &["commit", "--quiet", "--allow-empty", "-m", message]);
        self.head_sha()
    }

    /// Create a commit authored by someone else
    pub fn commit_as(&self, name: &str, email: &str, message: &str) -> String {
        let author = format!("{name} <{email}>");
        run_git(
            self.path(),
            &["commit", "--quiet", "--allow-empty", "--author", &author, "-m", message],
        );
        self.head_sha()
    }

    /// Create a file and commit it in one step
    pub fn create_and_commit(&self, relative_path: &str, content: &str, message: &str) -> String {
        self.create_file(relative_path, content);
        self.commit(message)
    }

    /// Create multiple commits, `Commit 0` first
    pub fn create_commits(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                self.create_and_commit(
                    &format!("file_{}.txt", i),
                    &format!("Content {}", i),
                    &format!("Commit {}", i),
                )
            })
            .collect()
    }

    /// Get the SHA of HEAD
    pub fn head_sha(&self) -> String {
        git_output(self.path(), &["rev-parse", "HEAD"])
    }

    /// Run an arbitrary git command in the repository
    pub fn git(&self, args: &[&str]) {
        run_git(self.path(), args);
    }
}

/// A bare repository usable as `origin`
pub struct TestRemote {
    temp_dir: TempTestDir,
}

impl TestRemote {
    /// Create a bare repository
    pub fn new(test_name: &str) -> Self {
        let temp_dir = TempTestDir::new(&format!("{test_name}-remote"));
        run_git(temp_dir.path(), &["init", "--quiet", "--bare"]);
        Self { temp_dir }
    }

    /// Path of the bare repository
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Run a git command in the given directory, panicking on failure
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run git command");

    if !output.status.success() {
        panic!(
            "Git command failed: git {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run git command");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
