// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! codewise-git: repository history collection for review prompts
//!
//! This library crate turns repository state into bounded, deterministic
//! text suitable for a language-model prompt: recent-commit transcripts,
//! the pending changes of a branch, the staged diff and per-file authorship.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use codewise_git::{CollectOptions, GitCli, HistoryCollector};
//!
//! let collector = HistoryCollector::new(GitCli::new());
//! let outcome = collector.collect(Path::new("."), &CollectOptions::latest(5));
//! if let Some(text) = outcome.text() {
//!     println!("{text}");
//! }
//! ```

pub mod blame;
pub mod command;
pub mod commit;
pub mod error;
pub mod history;
pub mod outcome;
pub mod parser;
pub mod pending;
pub mod repo;
pub mod truncate;

pub use blame::{AuthorShare, blame_summary};
pub use command::{DEFAULT_GIT_TIMEOUT, GitCli, GitRunner};
pub use commit::{CommitRecord, FileChangeStat};
pub use error::GitError;
pub use history::{CollectOptions, HistoryCollector, PatchSection, Transcript};
pub use outcome::Outcome;
pub use pending::{ComparisonBase, PendingChanges, PendingCollector, PendingOptions};
pub use repo::{FALLBACK_IDENTITY, GitRepo, acting_identity, repository_root};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::command::{GitCli, GitRunner};
    pub use crate::commit::{CommitRecord, FileChangeStat};
    pub use crate::error::GitError;
    pub use crate::history::{CollectOptions, HistoryCollector};
    pub use crate::outcome::Outcome;
    pub use crate::pending::PendingCollector;
}
