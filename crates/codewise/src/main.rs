// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! codewise: AI code review for the git workflow
//!
//! Model answers are printed to stdout; logs go to stderr.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use codewise::config::{Command, Config, load_dotenv};
use codewise::llm::HttpGenerator;
use codewise::notify::TelegramNotifier;
use codewise::pipeline::{self, Pipeline, PipelineSettings, RunStatus};
use codewise_git::GitCli;
use tracing::{debug, error, info, warn};

fn main() -> ExitCode {
    // Reported once logging is up; variables already set win over the file
    let dotenv = load_dotenv(None);
    let mut config = Config::parse();
    if let Some(path) = config.env_file.clone() {
        if let Err(e) = load_dotenv(Some(&path)) {
            eprintln!("Failed to load {}: {e}", path.display());
            return ExitCode::from(RunStatus::Failure.code());
        }
        config = Config::parse();
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env file"),
    }

    match run(&config) {
        Ok(status) => status.into(),
        Err(e) => {
            error!("{e:#}");
            RunStatus::Failure.into()
        }
    }
}

fn run(config: &Config) -> anyhow::Result<RunStatus> {
    let Some(ref command) = config.command else {
        Config::command().print_help()?;
        return Ok(RunStatus::Success);
    };

    config.validate()?;
    let repo = config.repo_root();
    let runner = GitCli::new().with_timeout(config.git_timeout());
    let mut stdout = io::stdout().lock();

    if !command.needs_llm()
        && let Command::Authorship { file } = command
    {
        return Ok(pipeline::authorship(&runner, &repo, file, &mut stdout)?);
    }

    let settings = config
        .llm_settings()
        .context("text-generation provider is not configured")?;
    let generator = HttpGenerator::new(settings).context("failed to build the provider client")?;
    debug!(provider = %config.provider(), model = %config.model(), "provider ready");

    let pipeline_settings = PipelineSettings {
        repo,
        branch: config.branch_name(),
        provider: config.provider(),
        model: config.model(),
        language: config.language(),
    };
    let mut pipeline = Pipeline::new(pipeline_settings, generator, runner);

    if matches!(command, Command::Review { .. })
        && let Some((token, chat_id)) = config.telegram()
    {
        let notifier =
            TelegramNotifier::new(token, chat_id).context("failed to build the Telegram client")?;
        pipeline = pipeline.with_notifier(Box::new(notifier));
    }

    let status = pipeline.run(command, &mut stdout)?;
    info!(exit = status.code(), "done");
    Ok(status)
}
