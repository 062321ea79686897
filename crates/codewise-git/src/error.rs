// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Error types for codewise-git

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while querying a repository
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be spawned (missing or not executable)
    #[error("git executable '{program}' not found or not executable. Check that git is installed and on PATH")]
    NotInstalled {
        /// The program that was attempted
        program: String,
    },

    /// git ran but exited with a non-zero status
    #[error("git {args} exited with {status}: {stderr}")]
    CommandFailed {
        /// The arguments passed to git, space separated
        args: String,
        /// Exit status description
        status: String,
        /// Trimmed stderr output
        stderr: String,
    },

    /// git did not finish within the configured timeout and was killed
    #[error("git {args} timed out after {timeout_secs}s")]
    TimedOut {
        /// The arguments passed to git, space separated
        args: String,
        /// The timeout that elapsed
        timeout_secs: u64,
    },

    /// Repository not found at the specified path
    #[error("{path} is not a valid git repository")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error while talking to the git process or writing output
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },
}

impl GitError {
    /// Whether this error means the environment cannot run git at all.
    ///
    /// Only a missing or non-executable git binary is fatal; everything
    /// else (unknown refs, non-repositories, timeouts) is a soft failure
    /// that callers report and move past.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, GitError::NotInstalled { .. })
    }
}
