// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! The two-file verdict cache and the gate built on it
//!
//! A cached verdict is reused only when both files exist and the policy
//! report names the current provider/model pair. Either file missing means
//! "not yet satisfied" and forces a fresh evaluation; a crash between the
//! two writes therefore heals itself on the next run.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::normalize::{normalize_line, provider_model_key};
use crate::verdict::{Verdict, parse_verdict};

/// Directory, relative to the repository root, holding the cache files
pub const JUDGMENT_DIR: &str = "analyses-lgpd-judgment";

/// File name of the policy report
pub const POLICY_FILE: &str = "policy-report.md";

/// File name of the verdict
pub const VERDICT_FILE: &str = "verdict.md";

/// External capability that assesses a provider's data policy.
///
/// Both calls are assumed to be slow and billed; the gate invokes them only
/// on a cache miss.
pub trait PolicyEvaluator {
    /// Describe the data-retention policy of `provider` for `model`
    ///
    /// # Errors
    ///
    /// Returns `GateError::PolicyReport` when the assessment cannot be produced.
    fn policy_report(&self, provider: &str, model: &str) -> Result<String, GateError>;

    /// Judge a policy report, answering with a yes/no line
    ///
    /// # Errors
    ///
    /// Returns `GateError::Judgment` when the judgment cannot be produced.
    fn judge(&self, report: &str) -> Result<String, GateError>;
}

impl<E: PolicyEvaluator + ?Sized> PolicyEvaluator for &E {
    fn policy_report(&self, provider: &str, model: &str) -> Result<String, GateError> {
        (**self).policy_report(provider, model)
    }

    fn judge(&self, report: &str) -> Result<String, GateError> {
        (**self).judge(report)
    }
}

/// Locations of the two cache files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePaths {
    /// Policy report path
    pub policy: PathBuf,
    /// Verdict path
    pub verdict: PathBuf,
}

impl GatePaths {
    /// Explicit file locations
    #[must_use]
    pub fn new(policy: impl Into<PathBuf>, verdict: impl Into<PathBuf>) -> Self {
        Self {
            policy: policy.into(),
            verdict: verdict.into(),
        }
    }

    /// The standard locations under `<repo>/analyses-lgpd-judgment/`
    #[must_use]
    pub fn in_repo(repo: impl AsRef<Path>) -> Self {
        let dir = repo.as_ref().join(JUDGMENT_DIR);
        Self {
            policy: dir.join(POLICY_FILE),
            verdict: dir.join(VERDICT_FILE),
        }
    }
}

/// Whether a cached verdict exists for this provider/model pair.
///
/// False when either file is missing. Otherwise the policy file is scanned
/// line by line for a line normalizing to the key; the scan stops with a
/// miss at the first blank line, so the key must lead the file. Read errors
/// are logged and count as a miss.
#[must_use]
pub fn has_cached_verdict(policy: &Path, verdict: &Path, provider: &str, model: &str) -> bool {
    if !policy.exists() || !verdict.exists() {
        debug!(
            policy_exists = policy.exists(),
            verdict_exists = verdict.exists(),
            "verdict cache incomplete"
        );
        return false;
    }

    let key = provider_model_key(provider, model);
    match key_leads_file(policy, &key) {
        Ok(hit) => {
            debug!(key = %key, hit, "verdict cache lookup");
            hit
        }
        Err(e) => {
            warn!(error = %e, "could not read policy report");
            false
        }
    }
}

// Stops at the first blank line: a key below a paragraph break is not found.
fn key_leads_file(policy: &Path, key: &str) -> Result<bool, GateError> {
    let io_err = |source| GateError::Io {
        path: policy.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(policy).map_err(io_err)?);
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        if normalize_line(&line) == key {
            return Ok(true);
        }
        if line.trim().is_empty() {
            return Ok(false);
        }
    }
    Ok(false)
}

/// Parse the verdict stored at `path`; read errors are logged and yield
/// `Verdict::Undetermined`.
#[must_use]
pub fn read_verdict(path: &Path) -> Verdict {
    match fs::read_to_string(path) {
        Ok(text) => parse_verdict(&text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read verdict");
            Verdict::Undetermined
        }
    }
}

/// Make `key` the first line of the report unless its first non-empty line
/// already is the key
fn with_key_line(report: &str, key: &str) -> String {
    let body = report.trim_start();
    let leads = body
        .lines()
        .next()
        .is_some_and(|line| normalize_line(line) == key);
    if leads {
        body.to_string()
    } else {
        format!("{key}\n{report}")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), GateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| GateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Compliance gate over a policy evaluator and the on-disk cache
pub struct ComplianceGate<E> {
    paths: GatePaths,
    evaluator: E,
}

impl<E: PolicyEvaluator> ComplianceGate<E> {
    /// Create a gate storing its cache at `paths`
    #[must_use]
    pub fn new(paths: GatePaths, evaluator: E) -> Self {
        Self { paths, evaluator }
    }

    /// The cache file locations
    #[must_use]
    pub fn paths(&self) -> &GatePaths {
        &self.paths
    }

    /// Run both evaluation calls, persist their output and return the verdict.
    ///
    /// If either call fails nothing is written and the verdict is
    /// `Undetermined`. A failed write is logged; the verdict computed in
    /// memory is still returned.
    pub fn evaluate_and_cache(&self, provider: &str, model: &str) -> Verdict {
        info!(provider, model, "assessing provider data policy");
        let key = provider_model_key(provider, model);

        let report = match self.evaluator.policy_report(provider, model) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "policy assessment failed, nothing cached");
                return Verdict::Undetermined;
            }
        };
        let judgment = match self.evaluator.judge(&report) {
            Ok(judgment) => judgment,
            Err(e) => {
                warn!(error = %e, "policy judgment failed, nothing cached");
                return Verdict::Undetermined;
            }
        };

        match write_file(&self.paths.policy, &with_key_line(&report, &key)) {
            Ok(()) => debug!(path = %self.paths.policy.display(), "policy report saved"),
            Err(e) => warn!(error = %e, "could not save policy report"),
        }
        match write_file(&self.paths.verdict, &judgment) {
            Ok(()) => debug!(path = %self.paths.verdict.display(), "verdict saved"),
            Err(e) => warn!(error = %e, "could not save verdict"),
        }

        let verdict = parse_verdict(&judgment);
        info!(provider, model, %verdict, "compliance verdict");
        verdict
    }

    /// Return the cached verdict for the pair, evaluating on a miss
    pub fn gate(&self, provider: &str, model: &str) -> Verdict {
        if has_cached_verdict(&self.paths.policy, &self.paths.verdict, provider, model) {
            let verdict = read_verdict(&self.paths.verdict);
            info!(provider, model, %verdict, "using cached compliance verdict");
            return verdict;
        }
        self.evaluate_and_cache(provider, model)
    }
}
