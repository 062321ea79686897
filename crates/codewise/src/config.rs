// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Configuration for the codewise CLI
//!
//! Every setting can come from a flag or from the environment (a `.env`
//! file is loaded before parsing). The resolved values are handed to the
//! collectors, the gate and the pipeline explicitly; nothing below `main`
//! reads the process environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use codewise_git::truncate::{AUTHOR_DIFF_CAP, DEFAULT_DIFF_CAP};
use codewise_git::{DEFAULT_GIT_TIMEOUT, GitRepo, repository_root};

use crate::llm::{DEFAULT_LLM_TIMEOUT, LlmSettings, Provider};
use crate::prompts::DEFAULT_LANGUAGE;

/// Default number of commits in a scored review
pub const DEFAULT_REVIEW_COMMITS: usize = 3;

/// Codewise - AI code review for your git workflow
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "codewise")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Review mode to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Repository to analyze
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "CODEWISE_REPO", global = true)]
    pub repo: Option<PathBuf>,

    /// Branch to analyze
    ///
    /// Defaults to the checked-out branch, or HEAD when detached.
    #[arg(short, long, global = true)]
    pub branch: Option<String>,

    /// Text-generation provider (google, openai, groq, cohere)
    #[arg(long, env = "AI_PROVIDER", value_enum, ignore_case = true, global = true)]
    pub provider: Option<Provider>,

    /// Model identifier; defaults to the provider's default model
    #[arg(long, env = "AI_MODEL", global = true)]
    pub model: Option<String>,

    /// API key for the provider
    ///
    /// Falls back to GEMINI_API_KEY, OPENAI_API_KEY, GROQ_API_KEY or
    /// COHERE_API_KEY depending on the provider.
    #[arg(long, env = "CODEWISE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the provider API (proxies, self-hosted gateways)
    #[arg(long, env = "CODEWISE_LLM_BASE_URL", global = true)]
    pub llm_base_url: Option<String>,

    /// Language the model should answer in
    #[arg(long, env = "CODEWISE_LANGUAGE", global = true)]
    pub language: Option<String>,

    /// Seconds before a git command is killed
    #[arg(long, env = "CODEWISE_GIT_TIMEOUT", global = true)]
    pub git_timeout_secs: Option<u64>,

    /// Seconds before a text-generation request is abandoned
    #[arg(long, env = "CODEWISE_LLM_TIMEOUT", global = true)]
    pub llm_timeout_secs: Option<u64>,

    /// Additional .env file to load before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so model output on stdout can be piped.
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,

    #[arg(long, env = "GEMINI_API_KEY", hide = true, hide_env_values = true)]
    #[doc(hidden)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
    #[doc(hidden)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "GROQ_API_KEY", hide = true, hide_env_values = true)]
    #[doc(hidden)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "COHERE_API_KEY", hide = true, hide_env_values = true)]
    #[doc(hidden)]
    pub cohere_api_key: Option<String>,

    /// Telegram bot token for review notifications
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat receiving review notifications
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

/// Available review modes
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quick review of the staged changes (pre-commit)
    Lint,

    /// Pull-request title for the commits not yet pushed
    Title,

    /// Pull-request description for the commits not yet pushed
    Describe,

    /// Full multi-step analysis of the commits not yet pushed
    ///
    /// Reports are written to <repo>/analyses-completed/ and an executive
    /// summary is printed.
    Analyze,

    /// Scored review of recent commits, optionally notifying a manager
    Review {
        /// Number of recent commits to review
        #[arg(short = 'n', long, default_value_t = DEFAULT_REVIEW_COMMITS)]
        commits: usize,

        /// Only review commits by this author email
        #[arg(long)]
        author: Option<String>,

        /// Per-commit diff cap in characters
        #[arg(long)]
        diff_cap: Option<usize>,
    },

    /// Check the provider against the LGPD and print the verdict
    Compliance,

    /// Summarize who wrote each line of a file
    Authorship {
        /// File path relative to the repository root
        file: String,
    },
}

impl Command {
    /// Whether the mode calls the text-generation provider
    #[must_use]
    pub fn needs_llm(&self) -> bool {
        !matches!(self, Command::Authorship { .. })
    }
}

impl Config {
    /// Repository path, current directory by default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Root of the work tree containing [`Config::repo_path`]
    ///
    /// Output directories are created here, so running from a subdirectory
    /// behaves like running from the top level. Falls back to the given
    /// path when it is not inside a work tree.
    #[must_use]
    pub fn repo_root(&self) -> PathBuf {
        let path = self.repo_path();
        repository_root(&path).unwrap_or(path)
    }

    /// The configured branch, else the checked-out branch, else `HEAD`
    #[must_use]
    pub fn branch_name(&self) -> String {
        if let Some(ref branch) = self.branch {
            return branch.clone();
        }
        GitRepo::discover(self.repo_path())
            .ok()
            .and_then(|repo| repo.current_branch())
            .unwrap_or_else(|| "HEAD".to_string())
    }

    /// Selected provider, Google by default
    #[must_use]
    pub fn provider(&self) -> Provider {
        self.provider.unwrap_or_default()
    }

    /// Selected model, the provider's default when unset
    #[must_use]
    pub fn model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider().default_model().to_string())
    }

    /// Output language for model answers
    #[must_use]
    pub fn language(&self) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Timeout applied to each git command
    #[must_use]
    pub fn git_timeout(&self) -> Duration {
        self.git_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GIT_TIMEOUT)
    }

    /// Timeout applied to each generation request
    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        self.llm_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LLM_TIMEOUT)
    }

    /// The API key: explicit key first, then the provider's own variable
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        let provider_key = match self.provider() {
            Provider::Google => &self.gemini_api_key,
            Provider::OpenAi => &self.openai_api_key,
            Provider::Groq => &self.groq_api_key,
            Provider::Cohere => &self.cohere_api_key,
        };
        self.api_key
            .clone()
            .or_else(|| provider_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// Per-commit diff cap for a review: explicit value, else the author or
    /// default cap
    #[must_use]
    pub fn review_diff_cap(author: Option<&str>, explicit: Option<usize>) -> usize {
        explicit.unwrap_or(if author.is_some() {
            AUTHOR_DIFF_CAP
        } else {
            DEFAULT_DIFF_CAP
        })
    }

    /// Settings for the text-generation client
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when no key is configured.
    pub fn llm_settings(&self) -> Result<LlmSettings, ConfigError> {
        let provider = self.provider();
        let api_key = self.api_key().ok_or(ConfigError::MissingApiKey {
            provider,
            variable: provider.api_key_variable(),
        })?;
        let mut settings = LlmSettings::new(provider, api_key)
            .with_model(self.model())
            .with_timeout(self.llm_timeout());
        if let Some(ref base) = self.llm_base_url {
            settings = settings.with_base_url(base.clone());
        }
        Ok(settings)
    }

    /// Telegram token and chat id, `None` unless both are set
    #[must_use]
    pub fn telegram(&self) -> Option<(String, String)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some((token.clone(), chat.clone()))
            }
            _ => None,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the repository path is missing or not a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let repo = self.repo_path();
        if !repo.exists() {
            return Err(ConfigError::RepoNotFound(repo));
        }
        if !repo.is_dir() {
            return Err(ConfigError::RepoNotDirectory(repo));
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Load environment variables from a `.env` file.
///
/// With `path` the file must exist and parse. Without it, a `.env` in the
/// current directory or an ancestor is loaded when present; its absence is
/// not an error. Variables already set are never overwritten.
///
/// # Errors
///
/// Returns the `dotenvy` error for a missing explicit file, an unreadable
/// file or a line that does not parse.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if path.is_none() && e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// No API key for the selected provider
    #[error("No API key for provider '{provider}': set {variable} or CODEWISE_API_KEY")]
    MissingApiKey {
        /// Selected provider
        provider: Provider,
        /// Provider-specific variable
        variable: &'static str,
    },
}
