// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Markdown report files

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;

/// Directory, relative to the repository root, receiving analysis reports
pub const REPORT_DIR: &str = "analyses-completed";

/// Writes UTF-8 reports into one directory, overwriting existing files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSink {
    dir: PathBuf,
}

impl ReportSink {
    /// A sink writing into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The standard sink for `<repo>/analyses-completed`
    #[must_use]
    pub fn in_repo(repo: &Path) -> Self {
        Self::new(repo.join(REPORT_DIR))
    }

    /// The target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` to `file_name`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the directory or the file cannot be written.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), chars = contents.chars().count(), "report written");
        Ok(path)
    }
}
