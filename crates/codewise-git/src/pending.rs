// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Pending changes of a branch and the working tree
//!
//! Two inputs for the short review flows:
//!
//! - [`PendingCollector::write_input`] compares a local branch with its
//!   remote-tracking ref (commits since the last push) or, for a branch that
//!   was never pushed, with the remote trunk, and writes the commit subjects
//!   plus the consolidated diff to a file.
//! - [`PendingCollector::staged_changes`] reports what `git diff --cached`
//!   would send for a pre-commit lint.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::command::GitRunner;
use crate::error::GitError;
use crate::outcome::Outcome;
use crate::repo::GitRepo;
use crate::truncate::{DEFAULT_PENDING_DIFF_CAP, exceeds, truncate_chars};

/// Remote consulted for tracking refs
pub const DEFAULT_REMOTE: &str = "origin";

/// Trunk branch used as the base for branches that were never pushed
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Returned by [`PendingCollector::staged_changes`] when only unstaged
/// modifications exist
pub const UNSTAGED_WARNING: &str = "WARNING: No changes in the staging area, but there are unstaged modifications.\nUse 'git add <file>' to prepare them for analysis.";

/// Prefix of the message returned when the working tree cannot be queried
pub const STAGED_FAILURE_PREFIX: &str = "FAILURE: Error interacting with the git repository";

const PENDING_ERROR_PREFIX: &str = "Error generating analysis input";

/// Options for the pending-changes comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOptions {
    /// Remote whose tracking refs are compared against
    pub remote: String,
    /// Trunk branch name on that remote
    pub base_branch: String,
    /// Ceiling for the consolidated diff, in characters
    pub diff_cap: usize,
}

impl Default for PendingOptions {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            diff_cap: DEFAULT_PENDING_DIFF_CAP,
        }
    }
}

/// What the branch is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonBase {
    /// The branch's own remote-tracking ref: commits since the last push
    SinceLastPush(String),
    /// The remote trunk: a new branch compared in full
    Trunk(String),
}

impl ComparisonBase {
    /// The revision to diff against
    #[must_use]
    pub fn revision(&self) -> &str {
        match self {
            ComparisonBase::SinceLastPush(rev) | ComparisonBase::Trunk(rev) => rev,
        }
    }
}

impl fmt::Display for ComparisonBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonBase::SinceLastPush(rev) => write!(f, "{rev} (commits since last push)"),
            ComparisonBase::Trunk(rev) => write!(f, "{rev} (new branch compared with trunk)"),
        }
    }
}

/// Commits and diff a branch has on top of its base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChanges {
    /// The comparison base
    pub base: ComparisonBase,
    /// `- <subject>` lines in git's log order
    pub subjects: Vec<String>,
    /// Unified diff between base and branch, capped
    pub diff: String,
    /// Whether the diff hit the ceiling
    pub truncated: bool,
}

impl PendingChanges {
    /// Render the analysis input document
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = vec![
            format!("Analyzing {} new commit(s).", self.subjects.len()),
            format!("Comparison base: {}", self.base),
            String::new(),
            "Commit messages:".to_string(),
            String::new(),
        ];
        out.extend(self.subjects.iter().cloned());
        out.push(String::new());
        out.push("=".repeat(80));
        out.push("Consolidated code differences to analyze:".to_string());
        out.push(self.diff.clone());
        if self.truncated {
            out.push(String::new());
            out.push("[diff truncated: remaining changes omitted]".to_string());
        }
        out.join("\n")
    }
}

/// Collects pending branch changes and working-tree state
pub struct PendingCollector<R> {
    runner: R,
    options: PendingOptions,
}

impl<R: GitRunner> PendingCollector<R> {
    /// Create a collector with default options
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            options: PendingOptions::default(),
        }
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: PendingOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options
    #[must_use]
    pub fn options(&self) -> &PendingOptions {
        &self.options
    }

    /// Compute the pending changes of `branch`, `None` when there are no
    /// commits to analyze.
    ///
    /// Refreshing remote refs is best-effort: a failed fetch is logged and
    /// the comparison continues with whatever refs are present locally.
    ///
    /// # Errors
    ///
    /// Returns `GitError` when the repository cannot be opened, the log or
    /// diff cannot be produced, or git is missing.
    pub fn pending_changes(
        &self,
        repo: &Path,
        branch: &str,
    ) -> Result<Option<PendingChanges>, GitError> {
        let remote = self.options.remote.as_str();

        info!(remote, "fetching remote updates");
        match self.runner.run(repo, &["fetch", remote, "--prune"]) {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!(error = %e, "fetch failed, comparing with local refs"),
        }

        let git_repo = GitRepo::discover(repo)?;
        let tracking = format!("refs/remotes/{remote}/{branch}");
        let base = if git_repo.reference_exists(&tracking) {
            info!(branch, "branch exists on remote, analyzing commits since last push");
            ComparisonBase::SinceLastPush(format!("{remote}/{branch}"))
        } else {
            info!(
                branch,
                trunk = %self.options.base_branch,
                "branch is new, comparing with remote trunk"
            );
            ComparisonBase::Trunk(format!("{remote}/{}", self.options.base_branch))
        };

        let range = format!("{}..{}", base.revision(), branch);
        let log = self
            .runner
            .run(repo, &["log", "--no-color", "--pretty=format:- %s", range.as_str()])?;
        let subjects: Vec<String> = log
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        if subjects.is_empty() {
            return Ok(None);
        }

        let diff = self
            .runner
            .run(repo, &["diff", "--no-color", range.as_str()])?;
        let diff = diff.trim_end();
        let truncated = exceeds(diff, self.options.diff_cap);
        if truncated {
            warn!(cap = self.options.diff_cap, "pending diff exceeds ceiling, truncating");
        }

        Ok(Some(PendingChanges {
            base,
            subjects,
            diff: truncate_chars(diff, self.options.diff_cap).to_string(),
            truncated,
        }))
    }

    /// Write the analysis input for `branch` to `output`, overwriting it.
    ///
    /// Returns `Outcome::Success` with the written text, `Outcome::Empty`
    /// when there is nothing to analyze (no file is written),
    /// `Outcome::Warning` for soft failures and `Outcome::Fatal` when git is
    /// missing.
    #[must_use]
    pub fn write_input(&self, repo: &Path, output: &Path, branch: &str) -> Outcome {
        let pending = match self.pending_changes(repo, branch) {
            Ok(Some(pending)) => pending,
            Ok(None) => {
                info!(branch, "no new commits to analyze");
                return Outcome::Empty;
            }
            Err(e) => {
                warn!(error = %e, "could not compute pending changes");
                return Outcome::from_error(&e, PENDING_ERROR_PREFIX);
            }
        };

        let text = pending.render();
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return Outcome::Warning(format!(
                "{PENDING_ERROR_PREFIX}: cannot create {}: {e}",
                parent.display()
            ));
        }
        match fs::write(output, &text) {
            Ok(()) => {
                debug!(path = %output.display(), bytes = text.len(), "analysis input written");
                Outcome::Success(text)
            }
            Err(e) => Outcome::Warning(format!(
                "{PENDING_ERROR_PREFIX}: cannot write {}: {e}",
                output.display()
            )),
        }
    }

    /// Report the staged diff for a lint pass.
    ///
    /// - staged changes present: `Outcome::Success(diff)`
    /// - only unstaged modifications: `Outcome::Warning(UNSTAGED_WARNING)`
    /// - clean tree: `Outcome::Empty`
    /// - git failure: `Outcome::Warning` prefixed with [`STAGED_FAILURE_PREFIX`],
    ///   or `Outcome::Fatal` when git is missing
    #[must_use]
    pub fn staged_changes(&self, repo: &Path) -> Outcome {
        match self.staged_or_unstaged(repo) {
            Ok(outcome) => outcome,
            Err(e) if e.is_fatal() => Outcome::Fatal(e.to_string()),
            Err(e) => {
                warn!(error = %e, "could not query working tree");
                Outcome::Warning(format!("{STAGED_FAILURE_PREFIX}: {e}"))
            }
        }
    }

    fn staged_or_unstaged(&self, repo: &Path) -> Result<Outcome, GitError> {
        let staged = self.runner.run(repo, &["diff", "--no-color", "--cached"])?;
        if !staged.trim().is_empty() {
            return Ok(Outcome::Success(staged.trim_end().to_string()));
        }

        let unstaged = self.runner.run(repo, &["diff", "--no-color"])?;
        if !unstaged.trim().is_empty() {
            return Ok(Outcome::Warning(UNSTAGED_WARNING.to_string()));
        }

        Ok(Outcome::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_render_layout() {
        let pending = PendingChanges {
            base: ComparisonBase::Trunk("origin/main".into()),
            subjects: vec!["- feat: one".into(), "- fix: two".into()],
            diff: "diff --git a/x b/x".into(),
            truncated: false,
        };
        let text = pending.render();
        assert!(text.starts_with("Analyzing 2 new commit(s).\n"));
        assert!(text.contains("Commit messages:\n\n- feat: one\n- fix: two\n"));
        assert!(text.contains(&"=".repeat(80)));
        assert!(text.ends_with("Consolidated code differences to analyze:\ndiff --git a/x b/x"));
    }

    #[test]
    fn test_render_notes_truncation() {
        let pending = PendingChanges {
            base: ComparisonBase::SinceLastPush("origin/feature".into()),
            subjects: vec!["- wip".into()],
            diff: "abc".into(),
            truncated: true,
        };
        assert!(pending.render().contains("[diff truncated"));
    }

    #[test]
    fn test_comparison_base_display() {
        assert_eq!(
            ComparisonBase::SinceLastPush("origin/x".into()).to_string(),
            "origin/x (commits since last push)"
        );
        assert_eq!(ComparisonBase::Trunk("origin/main".into()).revision(), "origin/main");
    }

    #[test]
    fn test_default_options() {
        let opts = PendingOptions::default();
        assert_eq!(opts.remote, "origin");
        assert_eq!(opts.base_branch, "main");
        assert_eq!(opts.diff_cap, DEFAULT_PENDING_DIFF_CAP);
    }
}
