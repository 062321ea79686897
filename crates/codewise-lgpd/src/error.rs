// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Error types for codewise-lgpd

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while evaluating or persisting a compliance verdict
#[derive(Debug, Error)]
pub enum GateError {
    /// The external evaluator failed to produce the policy report
    #[error("policy assessment failed: {0}")]
    PolicyReport(String),

    /// The external evaluator failed to judge the policy report
    #[error("policy judgment failed: {0}")]
    Judgment(String),

    /// A cache file could not be read or written
    #[error("IO error at {path}: {source}")]
    Io {
        /// The cache file involved
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GateError::Judgment("HTTP 429".into());
        assert_eq!(err.to_string(), "policy judgment failed: HTTP 429");

        let err = GateError::Io {
            path: PathBuf::from("/tmp/verdict.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/verdict.md"));
    }
}
