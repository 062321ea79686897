// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Commit records collected for a review transcript

use serde::{Deserialize, Serialize};

/// One file's line statistics within a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeStat {
    /// Path as reported by `git log --numstat`
    pub path: String,
    /// Lines added (0 for binary files)
    pub additions: u64,
    /// Lines deleted (0 for binary files)
    pub deletions: u64,
}

impl FileChangeStat {
    /// Build a stat from the raw numstat columns.
    ///
    /// Binary files report `-` instead of a count; that and any other
    /// non-numeric value is normalized to 0.
    #[must_use]
    pub fn from_numstat(additions: &str, deletions: &str, path: &str) -> Self {
        Self {
            path: path.to_string(),
            additions: additions.trim().parse().unwrap_or(0),
            deletions: deletions.trim().parse().unwrap_or(0),
        }
    }
}

/// One historical commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The full commit SHA
    pub hash: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author date, ISO-8601 (`--date=iso-strict`)
    pub timestamp: String,
    /// First line of the commit message
    pub subject: String,
    /// Per-file statistics in the order git reported them
    pub files: Vec<FileChangeStat>,
    /// Patch text, truncated to the collector's diff cap (if retrieved)
    pub diff_excerpt: Option<String>,
}

impl CommitRecord {
    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short SHA (first 8 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..8.min(self.hash.len())]
    }

    /// Render this commit as lines of the listing block.
    ///
    /// The header line keeps git's field order (hash, author, email, date,
    /// subject) and every touched file follows as `additions\tdeletions\tpath`.
    #[must_use]
    pub fn listing_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.files.len() + 1);
        lines.push(format!(
            "{}|{}|{}|{}|{}",
            self.hash, self.author_name, self.author_email, self.timestamp, self.subject
        ));
        for file in &self.files {
            lines.push(format!(
                "{}\t{}\t{}",
                file.additions, file.deletions, file.path
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn sample_commit() -> CommitRecord {
        CommitRecord {
            hash: "1945ab9c752534e733c38ba0109dc3b741f0a6eb".to_string(),
            author_name: "Test Author".to_string(),
            author_email: "test@example.com".to_string(),
            timestamp: "2026-01-17T02:33:06+00:00".to_string(),
            subject: "feat: add review mode".to_string(),
            files: vec![
                FileChangeStat::from_numstat("10", "2", "src/lib.rs"),
                FileChangeStat::from_numstat("-", "-", "logo.png"),
            ],
            diff_excerpt: None,
        }
    }

    #[test]
    fn test_numstat_binary_placeholder_is_zero() {
        let stat = FileChangeStat::from_numstat("-", "-", "image.png");
        assert_eq!(stat.additions, 0);
        assert_eq!(stat.deletions, 0);
        assert_eq!(stat.path, "image.png");
    }

    #[test]
    fn test_numstat_numeric_values() {
        let stat = FileChangeStat::from_numstat("12", "0", "README.md");
        assert_eq!(stat.additions, 12);
        assert_eq!(stat.deletions, 0);
    }

    #[test]
    fn test_is_valid_sha() {
        assert!(CommitRecord::is_valid_sha(
            "1945ab9c752534e733c38ba0109dc3b741f0a6eb"
        ));
        assert!(!CommitRecord::is_valid_sha("1945ab9"));
        assert!(!CommitRecord::is_valid_sha(
            "1945ab9c752534e733c38ba0109dc3b741f0a6eg"
        ));
        assert!(!CommitRecord::is_valid_sha(""));
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(sample_commit().short_hash(), "1945ab9c");
    }

    #[test]
    fn test_short_hash_handles_short_input() {
        let mut commit = sample_commit();
        commit.hash = "abc".to_string();
        assert_eq!(commit.short_hash(), "abc");
    }

    #[test]
    fn test_listing_lines() {
        let lines = sample_commit().listing_lines();
        assert_eq!(
            lines,
            vec![
                "1945ab9c752534e733c38ba0109dc3b741f0a6eb|Test Author|test@example.com|2026-01-17T02:33:06+00:00|feat: add review mode".to_string(),
                "10\t2\tsrc/lib.rs".to_string(),
                "0\t0\tlogo.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let commit = sample_commit();
        let json = serde_json::to_string(&commit).expect("serialize");
        let back: CommitRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(commit, back);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: numstat columns never produce a panic and non-numeric
        /// values always collapse to zero
        #[test]
        fn prop_numstat_non_numeric_is_zero(col in "[^0-9]*") {
            let stat = FileChangeStat::from_numstat(&col, &col, "f");
            prop_assert_eq!(stat.additions, 0);
            prop_assert_eq!(stat.deletions, 0);
        }

        /// Property: numeric columns survive unchanged
        #[test]
        fn prop_numstat_numeric_roundtrip(a in 0u64..1_000_000, d in 0u64..1_000_000) {
            let stat = FileChangeStat::from_numstat(&a.to_string(), &d.to_string(), "f");
            prop_assert_eq!(stat.additions, a);
            prop_assert_eq!(stat.deletions, d);
        }
    }
}
