// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Line authorship summary for a single file (`git blame --line-porcelain`)

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::command::GitRunner;
use crate::outcome::Outcome;

/// Lines attributed to one author
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorShare {
    /// Author name
    pub author: String,
    /// Author email, without angle brackets
    pub email: String,
    /// Number of lines attributed to the author
    pub lines: usize,
    /// Share of the file, 0-100
    pub percentage: f64,
    /// Most recently seen commit SHA for this author
    pub last_commit: String,
}

/// Aggregate `--line-porcelain` output per author, largest share first.
///
/// Ties are broken by author name so the order is deterministic.
#[must_use]
pub fn parse_blame(output: &str) -> Vec<AuthorShare> {
    struct Acc {
        email: String,
        lines: usize,
        last_commit: String,
    }

    let mut by_author: HashMap<String, Acc> = HashMap::new();
    let mut commit = String::new();
    let mut author: Option<String> = None;
    let mut email = String::new();
    let mut total = 0usize;

    for line in output.lines() {
        if let Some(name) = line.strip_prefix("author ") {
            author = Some(name.to_string());
        } else if let Some(mail) = line.strip_prefix("author-mail ") {
            email = mail.trim().trim_start_matches('<').trim_end_matches('>').to_string();
        } else if line.starts_with('\t') {
            // Each blamed line ends its porcelain block with the content line.
            if let Some(ref name) = author {
                let acc = by_author.entry(name.clone()).or_insert_with(|| Acc {
                    email: email.clone(),
                    lines: 0,
                    last_commit: commit.clone(),
                });
                acc.lines += 1;
                acc.last_commit = commit.clone();
                total += 1;
            }
        } else if let Some(sha) = line.split_whitespace().next()
            && sha.len() == 40
            && sha.chars().all(|c| c.is_ascii_hexdigit())
        {
            commit = sha.to_string();
        }
    }

    let mut shares: Vec<AuthorShare> = by_author
        .into_iter()
        .map(|(author, acc)| AuthorShare {
            author,
            email: acc.email,
            lines: acc.lines,
            percentage: if total == 0 {
                0.0
            } else {
                acc.lines as f64 * 100.0 / total as f64
            },
            last_commit: acc.last_commit,
        })
        .collect();
    shares.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.author.cmp(&b.author)));
    shares
}

/// Render shares as a report for `file`
#[must_use]
pub fn render_blame(file: &str, shares: &[AuthorShare]) -> String {
    let rule = "=".repeat(80);
    let mut out = vec![rule.clone(), format!("AUTHORSHIP ANALYSIS: {file}"), rule, String::new()];
    for share in shares {
        out.push(format!("Author: {}", share.author));
        out.push(format!("Email: {}", share.email));
        out.push(format!("Lines: {} ({:.1}%)", share.lines, share.percentage));
        out.push(format!(
            "Last commit: {}",
            &share.last_commit[..8.min(share.last_commit.len())]
        ));
        out.push(String::new());
    }
    out.join("\n")
}

/// Summarize who wrote each line of `file` (relative to the repository root).
///
/// A missing file yields `Outcome::Warning`; a missing git binary yields
/// `Outcome::Fatal`.
#[must_use]
pub fn blame_summary<R: GitRunner>(runner: &R, repo: &Path, file: &str) -> Outcome {
    if !repo.join(file).exists() {
        return Outcome::Warning(format!("Error: file {file} not found."));
    }
    match runner.run(repo, &["blame", "--line-porcelain", "--", file]) {
        Ok(output) => Outcome::Success(render_blame(file, &parse_blame(&output))),
        Err(e) => {
            warn!(file, error = %e, "git blame failed");
            Outcome::from_error(&e, "Error running git blame")
        }
    }
}
