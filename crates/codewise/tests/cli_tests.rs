// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! CLI parsing tests
//!
//! These tests verify subcommand parsing, global flags and the logging
//! level configuration. Only explicitly passed flags are asserted, since
//! most options also read the environment.

use std::path::PathBuf;

use clap::Parser;
use codewise::config::{Command, Config, DEFAULT_REVIEW_COMMITS};
use codewise::llm::Provider;
use tracing::Level;

// ============================================================================
// Subcommand tests
// ============================================================================

#[test]
fn test_no_subcommand_parses() {
    let config = Config::try_parse_from(["codewise"]).expect("parse should succeed");
    assert!(config.command.is_none());
}

#[test]
fn test_simple_subcommands() {
    let cases = [
        ("lint", Command::Lint),
        ("title", Command::Title),
        ("describe", Command::Describe),
        ("analyze", Command::Analyze),
        ("compliance", Command::Compliance),
    ];
    for (arg, expected) in cases {
        let config = Config::try_parse_from(["codewise", arg]).expect("parse should succeed");
        assert_eq!(config.command, Some(expected), "subcommand {arg}");
    }
}

#[test]
fn test_review_defaults() {
    let config = Config::try_parse_from(["codewise", "review"]).expect("parse should succeed");
    assert_eq!(
        config.command,
        Some(Command::Review {
            commits: DEFAULT_REVIEW_COMMITS,
            author: None,
            diff_cap: None,
        })
    );
}

#[test]
fn test_review_arguments() {
    let config = Config::try_parse_from([
        "codewise",
        "review",
        "-n",
        "5",
        "--author",
        "dev@example.com",
        "--diff-cap",
        "800",
    ])
    .expect("parse should succeed");
    assert_eq!(
        config.command,
        Some(Command::Review {
            commits: 5,
            author: Some("dev@example.com".into()),
            diff_cap: Some(800),
        })
    );
}

#[test]
fn test_review_rejects_non_numeric_commits() {
    let result = Config::try_parse_from(["codewise", "review", "-n", "many"]);
    assert!(result.is_err());
}

#[test]
fn test_authorship_requires_file() {
    assert!(Config::try_parse_from(["codewise", "authorship"]).is_err());

    let config = Config::try_parse_from(["codewise", "authorship", "src/lib.rs"])
        .expect("parse should succeed");
    assert_eq!(
        config.command,
        Some(Command::Authorship {
            file: "src/lib.rs".into()
        })
    );
    assert!(!config.command.as_ref().is_some_and(Command::needs_llm));
}

#[test]
fn test_unknown_subcommand_fails() {
    assert!(Config::try_parse_from(["codewise", "deploy"]).is_err());
}

// ============================================================================
// Global flag tests
// ============================================================================

#[test]
fn test_repo_flag_before_and_after_subcommand() {
    let before =
        Config::try_parse_from(["codewise", "-r", "/tmp/project", "lint"]).expect("parse before");
    let after = Config::try_parse_from(["codewise", "lint", "--repo", "/tmp/project"])
        .expect("parse after");
    assert_eq!(before.repo, Some(PathBuf::from("/tmp/project")));
    assert_eq!(before.repo, after.repo);
    assert_eq!(after.repo_path(), PathBuf::from("/tmp/project"));
}

#[test]
fn test_branch_flag() {
    let config =
        Config::try_parse_from(["codewise", "title", "-b", "feature/login"]).expect("parse");
    assert_eq!(config.branch_name(), "feature/login");
}

#[test]
fn test_provider_parsing_ignores_case() {
    let config = Config::try_parse_from(["codewise", "--provider", "GROQ"]).expect("parse");
    assert_eq!(config.provider(), Provider::Groq);

    let config = Config::try_parse_from(["codewise", "--provider", "openai"]).expect("parse");
    assert_eq!(config.provider(), Provider::OpenAi);

    let config = Config::try_parse_from(["codewise", "--provider", "Cohere"]).expect("parse");
    assert_eq!(config.provider(), Provider::Cohere);
}

#[test]
fn test_provider_gemini_alias() {
    let config = Config::try_parse_from(["codewise", "--provider", "gemini"]).expect("parse");
    assert_eq!(config.provider(), Provider::Google);
}

#[test]
fn test_invalid_provider_fails() {
    assert!(Config::try_parse_from(["codewise", "--provider", "acme"]).is_err());
}

#[test]
fn test_model_and_language_flags() {
    let config = Config::try_parse_from([
        "codewise",
        "--model",
        "gpt-4o",
        "--language",
        "English",
        "lint",
    ])
    .expect("parse");
    assert_eq!(config.model(), "gpt-4o");
    assert_eq!(config.language(), "English");
}

#[test]
fn test_timeout_flags() {
    let config = Config::try_parse_from([
        "codewise",
        "--git-timeout-secs",
        "5",
        "--llm-timeout-secs",
        "30",
    ])
    .expect("parse");
    assert_eq!(config.git_timeout().as_secs(), 5);
    assert_eq!(config.llm_timeout().as_secs(), 30);
}

// ============================================================================
// Logging flag tests
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["codewise", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_long_flag() {
    let config = Config::try_parse_from(["codewise", "--quiet"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["codewise", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_combined_short_flags() {
    let config = Config::try_parse_from(["codewise", "-vq", "lint"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(config.quiet);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    let result = Config::try_parse_from(["codewise", "--verbose=true"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}

#[test]
fn test_default_log_level_is_info() {
    let config = Config::try_parse_from(["codewise"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::INFO);
}
