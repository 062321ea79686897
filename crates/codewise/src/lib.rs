// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! codewise: AI code review for the git workflow
//!
//! This crate wires the repository collectors from `codewise-git` and the
//! compliance gate from `codewise-lgpd` to a text-generation provider. It
//! exports the pipeline for use in integration tests and as a library.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod llm;
pub mod notify;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod roles;

pub use config::{Command, Config, ConfigError};
pub use error::{LlmError, NotifyError, PipelineError, ReportError};
pub use llm::{HttpGenerator, LlmSettings, Provider, TextGenerator};
pub use notify::{Evaluation, Notifier, ParseMode, TelegramNotifier};
pub use pipeline::{LlmPolicyEvaluator, Pipeline, PipelineSettings, RunStatus};
pub use report::ReportSink;
pub use roles::Role;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Command, Config};
    pub use crate::llm::{Provider, TextGenerator};
    pub use crate::notify::Notifier;
    pub use crate::pipeline::{Pipeline, PipelineSettings, RunStatus};
}
