// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Git log parsing utilities
//!
//! The collector asks git for a machine-friendly listing: every commit starts
//! with an ASCII record separator and its header fields are joined by unit
//! separators, so subjects or author names containing `|` cannot confuse the
//! parser. `--numstat` lines follow each header.

use crate::commit::{CommitRecord, FileChangeStat};

const RECORD_SEPARATOR: char = '\u{1e}';
const FIELD_SEPARATOR: char = '\u{1f}';

/// `--pretty` format producing the records understood by [`parse_log`]
pub const LOG_FORMAT: &str = "--pretty=format:%x1e%H%x1f%an%x1f%ae%x1f%ad%x1f%s";

/// Parse `git log` output produced with [`LOG_FORMAT`], `--date=iso-strict`
/// and `--numstat`.
///
/// Records whose header does not carry all five fields are skipped. Numstat
/// lines that do not have three tab-separated columns are ignored.
#[must_use]
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .split(RECORD_SEPARATOR)
        .filter_map(parse_record)
        .collect()
}

fn parse_record(chunk: &str) -> Option<CommitRecord> {
    let mut lines = chunk.lines();
    let header = lines.next()?;

    let mut fields = header.splitn(5, FIELD_SEPARATOR);
    let hash = fields.next()?.trim();
    let author_name = fields.next()?;
    let author_email = fields.next()?;
    let timestamp = fields.next()?;
    let subject = fields.next()?;

    if hash.is_empty() {
        return None;
    }

    let files = lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut cols = line.splitn(3, '\t');
            let additions = cols.next()?;
            let deletions = cols.next()?;
            let path = cols.next()?;
            Some(FileChangeStat::from_numstat(additions, deletions, path))
        })
        .collect();

    Some(CommitRecord {
        hash: hash.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        timestamp: timestamp.to_string(),
        subject: subject.trim_end().to_string(),
        files,
        diff_excerpt: None,
    })
}

/// Extract the commit hash from `git show` output in its default format
/// (`commit <sha>` on the first line).
#[must_use]
pub fn patch_commit_hash(patch: &str) -> Option<&str> {
    let first = patch.lines().next()?;
    let hash = first.strip_prefix("commit ")?.split_whitespace().next()?;
    CommitRecord::is_valid_sha(hash).then_some(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn record(hash: &str, subject: &str, stats: &[&str]) -> String {
        let mut out = format!(
            "\u{1e}{hash}\u{1f}Ana Dev\u{1f}ana@example.com\u{1f}2026-03-01T10:00:00-03:00\u{1f}{subject}\n"
        );
        if !stats.is_empty() {
            out.push('\n');
            for s in stats {
                out.push_str(s);
                out.push('\n');
            }
        }
        out
    }

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn test_parse_two_commits_with_stats() {
        let out = format!(
            "{}{}",
            record(SHA_A, "feat: second", &["3\t1\tsrc/main.rs", "-\t-\tassets/logo.png"]),
            record(SHA_B, "chore: first", &["10\t0\tREADME.md"]),
        );
        let commits = parse_log(&out);
        assert_eq!(commits.len(), 2);

        assert_eq!(commits[0].hash, SHA_A);
        assert_eq!(commits[0].subject, "feat: second");
        assert_eq!(commits[0].author_name, "Ana Dev");
        assert_eq!(commits[0].author_email, "ana@example.com");
        assert_eq!(commits[0].timestamp, "2026-03-01T10:00:00-03:00");
        assert_eq!(commits[0].files.len(), 2);
        assert_eq!(commits[0].files[0].path, "src/main.rs");
        assert_eq!(commits[0].files[1].additions, 0);

        assert_eq!(commits[1].hash, SHA_B);
        assert_eq!(commits[1].files[0].additions, 10);
    }

    #[test]
    fn test_subject_with_pipes_is_preserved() {
        let out = record(SHA_A, "fix: a | b | c", &[]);
        let commits = parse_log(&out);
        assert_eq!(commits[0].subject, "fix: a | b | c");
    }

    #[test]
    fn test_commit_without_files() {
        let commits = parse_log(&record(SHA_A, "empty", &[]));
        assert_eq!(commits.len(), 1);
        assert!(commits[0].files.is_empty());
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n\n").is_empty());
    }

    #[test]
    fn test_malformed_header_skipped() {
        let out = format!("\u{1e}only\u{1f}two\n{}", record(SHA_B, "ok", &[]));
        let commits = parse_log(&out);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, SHA_B);
    }

    #[test]
    fn test_malformed_stat_line_ignored() {
        let out = record(SHA_A, "x", &["not a stat line", "1\t2\tok.rs"]);
        let commits = parse_log(&out);
        assert_eq!(commits[0].files.len(), 1);
        assert_eq!(commits[0].files[0].path, "ok.rs");
    }

    #[test]
    fn test_rename_path_kept_verbatim() {
        let out = record(SHA_A, "mv", &["0\t0\tsrc/{old.rs => new.rs}"]);
        let commits = parse_log(&out);
        assert_eq!(commits[0].files[0].path, "src/{old.rs => new.rs}");
    }

    #[test]
    fn test_patch_commit_hash() {
        let patch = format!("commit {SHA_A}\nAuthor: Ana\n\n    msg\n");
        assert_eq!(patch_commit_hash(&patch), Some(SHA_A));
        let decorated = format!("commit {SHA_B} (HEAD -> main)\n");
        assert_eq!(patch_commit_hash(&decorated), Some(SHA_B));
        assert_eq!(patch_commit_hash("diff --git a/x b/x"), None);
        assert_eq!(patch_commit_hash(""), None);
    }
}
