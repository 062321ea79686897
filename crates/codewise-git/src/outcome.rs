// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Tagged result of a collection request

use crate::error::GitError;

/// Result of a history-collection call.
///
/// Collection never raises past its boundary for expected git-level
/// failures; callers branch on the kind instead of inspecting strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text ready for a prompt (transcript, diff, report)
    Success(String),
    /// Nothing to do: no staged changes, no pending commits
    Empty,
    /// Soft failure or advisory message, safe to print and move on
    Warning(String),
    /// git cannot be run at all; the caller should abort
    Fatal(String),
}

impl Outcome {
    /// Map a git error to a soft or hard outcome, prefixing soft messages
    #[must_use]
    pub fn from_error(err: &GitError, prefix: &str) -> Self {
        if err.is_fatal() {
            Outcome::Fatal(err.to_string())
        } else {
            Outcome::Warning(format!("{prefix}: {err}"))
        }
    }

    /// Whether the outcome carries usable text
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Whether the caller should abort
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }

    /// The success text, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Success(text) => Some(text),
            _ => None,
        }
    }

    /// Consume and return the success text, if any
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Outcome::Success(text) => Some(text),
            _ => None,
        }
    }
}
