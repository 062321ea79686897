// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Prompt templates for each pipeline request

use crate::roles::{self, Role};

/// Output language used when none is configured
pub const DEFAULT_LANGUAGE: &str = "Brazilian Portuguese";

/// Answer expected from the lint request when nothing is wrong
pub const NO_ISSUES: &str = "No apparent issues detected.";

/// Marker line carrying the review score
pub const FINAL_SCORE_MARKER: &str = "Final score";

/// Marker opening the justification section of a review
pub const BREAKDOWN_MARKER: &str = "Score breakdown";

/// Marker closing the justification section of a review
pub const END_MARKER: &str = "End of justification";

/// One step of the full analysis, written to its own report file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStep {
    /// Short name used in logs and as the section heading in later context
    pub name: &'static str,
    /// Persona asked to perform the step
    pub role: Role,
    /// Report file name under the analyses directory
    pub file_name: &'static str,
    /// What the step asks for
    pub instruction: &'static str,
}

/// The sequential analysis steps; each receives the previous outputs
pub const ANALYSIS_STEPS: [AnalysisStep; 4] = [
    AnalysisStep {
        name: "Project structure",
        role: roles::SENIOR_ARCHITECT,
        file_name: "current-architecture.md",
        instruction: "Inspect the project structure touched by these changes. Describe the current architecture, where the change fits, and any structural problems it introduces or fixes.",
    },
    AnalysisStep {
        name: "Heuristics and integrations",
        role: roles::SENIOR_ANALYST,
        file_name: "heuristics-integrations.md",
        instruction: "Analyze the integrations, external libraries and APIs affected by these changes. Flag risky usage, missing error handling and performance heuristics worth checking.",
    },
    AnalysisStep {
        name: "S.O.L.I.D. adherence",
        role: roles::QUALITY_CONSULTANT,
        file_name: "solid-analysis.md",
        instruction: "Assess the adherence of the change to the S.O.L.I.D. principles, citing the code that supports each finding.",
    },
    AnalysisStep {
        name: "Design patterns",
        role: roles::QUALITY_CONTROL_MANAGER,
        file_name: "design-patterns.md",
        instruction: "Evaluate the correct application or absence of design patterns in the change and suggest patterns where they would simplify the code.",
    },
];

/// Report file for the mentoring step
pub const MENTORING_FILE: &str = "learning-suggestions.md";

/// Report file for the scored code review
pub const CODE_REVIEW_FILE: &str = "code-review.md";

fn with_prior(prior: &[(String, String)]) -> String {
    prior
        .iter()
        .map(|(name, text)| format!("## {name}\n\n{text}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Quick pre-commit review of a staged diff
#[must_use]
pub fn lint(diff: &str, language: &str) -> String {
    format!(
        "Quickly analyze the following code changes (git diff) and point out ONLY obvious problems or code smells. \
         Answer in {language}. Be concise, as a short bullet list. \
         If there are no problems, answer exactly '{NO_ISSUES}'.\n\nCode to analyze:\n{diff}"
    )
}

/// Pull-request title in Conventional Commits style
#[must_use]
pub fn pr_title(changes: &str, language: &str) -> String {
    format!(
        "Write a concise pull-request title following the Conventional Commits convention for the changes below. \
         The answer must be ONLY the title, in {language}, without quotes, backticks or any other text.\n\n{changes}"
    )
}

/// One-paragraph pull-request description
#[must_use]
pub fn pr_description(changes: &str, language: &str) -> String {
    format!(
        "Write a one-paragraph pull-request description, in {language}, for the changes below.\n\n{changes}"
    )
}

/// One analysis step over the pending changes and the previous findings
#[must_use]
pub fn analysis_step(
    step: &AnalysisStep,
    changes: &str,
    prior: &[(String, String)],
    language: &str,
) -> String {
    let mut prompt = format!(
        "{} Answer in {language}, formatted as markdown.\n\nChanges under review:\n{changes}",
        step.instruction
    );
    if !prior.is_empty() {
        prompt.push_str("\n\nFindings of the previous analysis steps:\n\n");
        prompt.push_str(&with_prior(prior));
    }
    prompt
}

/// Learning suggestions based on the analysis findings
#[must_use]
pub fn mentoring(prior: &[(String, String)], language: &str) -> String {
    format!(
        "Based on the technical analyses below, comment on the changes and suggest personalized learning resources, \
         in {language}, formatted as markdown, with links to material that would improve the code.\n\n{}",
        with_prior(prior)
    )
}

/// Executive summary of the full analysis
#[must_use]
pub fn executive_summary(prior: &[(String, String)], language: &str) -> String {
    format!(
        "Based on the complete analysis below, write a 'Pull Request Executive Summary' in {language}, \
         well formatted in markdown, with 3-4 detailed bullet points.\n\n{}",
        with_prior(prior)
    )
}

/// Scored review of recent commits
#[must_use]
pub fn code_review(transcript: &str, language: &str) -> String {
    format!(
        "Review the recent commits below and evaluate the developer's work. Answer in {language}, formatted as markdown. \
         Follow this structure exactly:\n\
         1. A line '{FINAL_SCORE_MARKER}: X/10' where X is a number from 0 to 10 (one decimal allowed).\n\
         2. A line '{BREAKDOWN_MARKER}' followed by one line per criterion (correctness, readability, tests, design) with the points given and why.\n\
         3. A line '{END_MARKER}'.\n\
         4. Detailed comments and suggestions.\n\n{transcript}"
    )
}

/// Data-retention policy report for a provider/model pair
#[must_use]
pub fn policy_report(provider: &str, model: &str, language: &str) -> String {
    format!(
        "Analyze the official data collection policy of the provider '{provider}' for the model '{model}'. \
         Write a report in {language} focused on how user input sent through the API is handled: collection, use for training, \
         retention period and sharing with third parties."
    )
}

/// LGPD judgment over a policy report; the verdict must lead the answer
#[must_use]
pub fn lgpd_judgment(report: &str) -> String {
    format!(
        "Based on the data policy report below, decide whether sending source code to this provider complies with \
         Brazil's General Data Protection Law (LGPD). The FIRST line of your answer must be exactly 'Yes' or 'No', \
         with nothing else on it. Explain your reasoning after that line.\n\nReport:\n{report}"
    )
}
