// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! In-process repository lookups
//!
//! Queries whose answer does not depend on git's text output go through
//! `git2`: validating the repository, reading configuration, checking refs.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};

use crate::error::GitError;

/// Label used when the repository has no configured `user.email`
pub const FALLBACK_IDENTITY: &str = "Developer";

/// A git repository opened for lookups
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Read a configuration value, `None` when unset
    ///
    /// # Errors
    ///
    /// Returns `GitError::Git2` if the configuration cannot be loaded.
    pub fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        let config = self.repo.config()?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a fully-qualified reference exists (e.g. `refs/remotes/origin/main`)
    #[must_use]
    pub fn reference_exists(&self, name: &str) -> bool {
        self.repo.find_reference(name).is_ok()
    }

    /// Short name of the checked-out branch, `None` when HEAD is detached or unborn
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(str::to_string)
    }
}

/// Root of the working tree containing `path`
///
/// `None` when `path` is not inside a repository or the repository is bare.
#[must_use]
pub fn repository_root(path: &Path) -> Option<PathBuf> {
    let repo = GitRepo::discover(path).ok()?;
    repo.workdir().map(Path::to_path_buf)
}

/// Resolve the acting identity for a repository.
///
/// Reads `user.email`; any failure (not a repository, unset key, unreadable
/// config) falls back to [`FALLBACK_IDENTITY`] and never aborts collection.
#[must_use]
pub fn acting_identity(repo_path: &Path) -> String {
    GitRepo::discover(repo_path)
        .and_then(|repo| repo.config_get("user.email"))
        .ok()
        .flatten()
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .unwrap_or_else(|| FALLBACK_IDENTITY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_nonexistent_repository() {
        let result = GitRepo::discover("/nonexistent/path/for/codewise");
        assert!(matches!(result, Err(GitError::RepositoryNotFound { .. })));
    }

    #[test]
    fn test_identity_falls_back_outside_repository() {
        assert_eq!(
            acting_identity(Path::new("/nonexistent/path/for/codewise")),
            FALLBACK_IDENTITY
        );
    }

    #[test]
    fn test_discover_from_manifest_dir() {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        // The crate may be built outside a checkout; only assert consistency.
        if let Ok(repo) = GitRepo::discover(manifest_dir) {
            assert!(repo.workdir().is_some());
        }
    }

    #[test]
    fn test_repository_root_outside_repository() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(repository_root(dir.path()), None);
    }
}
