// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Recent-commit transcripts
//!
//! Builds a bounded, deterministic text document describing the most recent
//! commits of a branch: a banner naming the acting identity, the commit
//! listing with per-file statistics, then one patch section per commit.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use codewise_git::{CollectOptions, GitCli, HistoryCollector, Outcome};
//!
//! let collector = HistoryCollector::new(GitCli::new());
//! match collector.collect(Path::new("."), &CollectOptions::latest(3)) {
//!     Outcome::Success(text) => println!("{text}"),
//!     other => eprintln!("{other:?}"),
//! }
//! ```

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::command::GitRunner;
use crate::commit::CommitRecord;
use crate::error::GitError;
use crate::outcome::Outcome;
use crate::parser::{LOG_FORMAT, parse_log, patch_commit_hash};
use crate::repo::{GitRepo, acting_identity};
use crate::truncate::{DEFAULT_DIFF_CAP, truncate_chars};

/// Prefix of the soft-failure message returned by [`HistoryCollector::collect`]
pub const COLLECT_ERROR_PREFIX: &str = "Error collecting data";

/// Default number of commits in a transcript
pub const DEFAULT_COMMITS_LIMIT: usize = 10;

const BANNER_WIDTH: usize = 80;

/// Parameters for a recent-commits transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Maximum number of commits to list and show
    pub commits_limit: usize,
    /// Only list commits by this author email
    pub author_email: Option<String>,
    /// Branch or revision to walk from
    pub branch: String,
    /// Per-commit patch cap, in characters
    pub diff_cap: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            commits_limit: DEFAULT_COMMITS_LIMIT,
            author_email: None,
            branch: "HEAD".to_string(),
            diff_cap: DEFAULT_DIFF_CAP,
        }
    }
}

impl CollectOptions {
    /// Options for the N most recent commits of HEAD
    #[must_use]
    pub fn latest(n: usize) -> Self {
        Self {
            commits_limit: n,
            ..Default::default()
        }
    }

    /// Filter by author email
    #[must_use]
    pub fn by_author(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    /// Walk from this branch or revision instead of HEAD
    #[must_use]
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Override the per-commit patch cap
    #[must_use]
    pub fn with_diff_cap(mut self, cap: usize) -> Self {
        self.diff_cap = cap;
        self
    }
}

/// One commit's patch excerpt as it appears in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSection {
    /// The revision the patch was requested for (`HEAD~1`, a SHA, ...)
    pub reference: String,
    /// The truncated patch text
    pub excerpt: String,
}

/// Structured transcript, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// `user.email` of the repository, or the fallback label
    pub identity: String,
    /// The requested commit count
    pub commits_limit: usize,
    /// Listed commits, newest first
    pub commits: Vec<CommitRecord>,
    /// Patch sections in retrieval order
    pub patches: Vec<PatchSection>,
}

impl Transcript {
    /// Render the transcript as prompt text
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "=".repeat(BANNER_WIDTH);
        let mut out: Vec<String> = vec![
            rule.clone(),
            format!("CODE ANALYSIS - {}", self.identity),
            rule,
            String::new(),
            format!("Last {} commits:", self.commits_limit),
            String::new(),
        ];

        let listing: Vec<String> = self
            .commits
            .iter()
            .map(|c| c.listing_lines().join("\n"))
            .collect();
        out.push(listing.join("\n\n"));
        out.push(String::new());

        for patch in &self.patches {
            out.push(format!("--- Changes for commit {} ---", patch.reference));
            out.push(patch.excerpt.clone());
            out.push(String::new());
        }

        out.join("\n")
    }
}

/// Collects recent commits and their patches
pub struct HistoryCollector<R> {
    runner: R,
}

impl<R: GitRunner> HistoryCollector<R> {
    /// Create a collector over the given git runner
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Build the structured transcript.
    ///
    /// A failure retrieving an individual patch is skipped; only the commit
    /// listing itself (or a missing git binary) fails the call.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` for a non-repository,
    /// `GitError::CommandFailed` when the listing cannot be produced and
    /// `GitError::NotInstalled` when git is missing.
    pub fn transcript(&self, repo: &Path, options: &CollectOptions) -> Result<Transcript, GitError> {
        GitRepo::discover(repo)?;
        let identity = acting_identity(repo);

        let max_count = format!("--max-count={}", options.commits_limit);
        let author = options
            .author_email
            .as_ref()
            .map(|email| format!("--author={email}"));

        let mut args = vec![
            "log",
            "--no-color",
            max_count.as_str(),
            LOG_FORMAT,
            "--date=iso-strict",
            "--numstat",
        ];
        if let Some(ref author) = author {
            args.push(author.as_str());
        }
        args.push(options.branch.as_str());
        args.push("--");

        let listing = self.runner.run(repo, &args)?;
        let mut commits = parse_log(&listing);
        commits.truncate(options.commits_limit);

        debug!(
            repo = %repo.display(),
            listed = commits.len(),
            limit = options.commits_limit,
            "commit listing parsed"
        );

        // Offsets from the branch tip unless the listing is filtered, in which
        // case the listed commits are shown by hash so both halves agree.
        let references: Vec<String> = if options.author_email.is_some() {
            commits.iter().map(|c| c.hash.clone()).collect()
        } else {
            (0..options.commits_limit)
                .map(|i| format!("{}~{}", options.branch, i))
                .collect()
        };

        let mut patches = Vec::with_capacity(references.len());
        for reference in references {
            match self
                .runner
                .run(repo, &["show", "--no-color", "--unified=3", reference.as_str(), "--"])
            {
                Ok(patch) => {
                    let excerpt = truncate_chars(&patch, options.diff_cap).to_string();
                    if let Some(hash) = patch_commit_hash(&patch)
                        && let Some(commit) = commits.iter_mut().find(|c| c.hash == hash)
                    {
                        commit.diff_excerpt = Some(excerpt.clone());
                    }
                    patches.push(PatchSection { reference, excerpt });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(reference = %reference, error = %e, "skipping patch section");
                }
            }
        }

        Ok(Transcript {
            identity,
            commits_limit: options.commits_limit,
            commits,
            patches,
        })
    }

    /// Build and render the transcript, folding failures into an [`Outcome`].
    ///
    /// Expected git failures become an `Outcome::Warning` prefixed with
    /// [`COLLECT_ERROR_PREFIX`]; a missing git binary becomes `Outcome::Fatal`.
    #[must_use]
    pub fn collect(&self, repo: &Path, options: &CollectOptions) -> Outcome {
        match self.transcript(repo, options) {
            Ok(transcript) => {
                info!(
                    repo = %repo.display(),
                    commits = transcript.commits.len(),
                    patches = transcript.patches.len(),
                    "history collected"
                );
                Outcome::Success(transcript.render())
            }
            Err(e) if e.is_fatal() => {
                error!(error = %e, "git unavailable");
                Outcome::from_error(&e, COLLECT_ERROR_PREFIX)
            }
            Err(e) => {
                warn!(repo = %repo.display(), error = %e, "history collection failed");
                Outcome::from_error(&e, COLLECT_ERROR_PREFIX)
            }
        }
    }
}
