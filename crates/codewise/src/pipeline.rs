// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Review modes
//!
//! Every mode that sends repository content to the provider passes the
//! compliance gate first; anything but a `Yes` verdict stops the mode before
//! a single byte of code leaves the machine.
//!
//! Model answers are written to the caller's output stream (stdout in the
//! binary). Status and diagnostics go through `tracing`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use codewise_git::{
    CollectOptions, GitRunner, HistoryCollector, Outcome, PendingCollector, acting_identity,
    blame_summary,
};
use codewise_lgpd::{ComplianceGate, GateError, GatePaths, PolicyEvaluator, Verdict};
use tracing::{debug, error, info, warn};

use crate::config::Command;
use crate::error::PipelineError;
use crate::llm::{Provider, TextGenerator};
use crate::notify::{Evaluation, Notifier, ParseMode, review_message};
use crate::prompts::{self, ANALYSIS_STEPS, CODE_REVIEW_FILE, MENTORING_FILE, NO_ISSUES};
use crate::report::ReportSink;
use crate::roles;

/// Directory, relative to the repository root, for transient inputs
pub const WORK_DIR: &str = ".codewise";

/// Pending-changes input consumed by the title/describe/analyze modes
pub const INPUT_FILE: &str = "analysis-input.txt";

/// How a mode ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Completed, or stopped on a soft warning
    Success,
    /// A required step failed
    Failure,
    /// The compliance gate did not return `Yes`
    Denied,
    /// git is not installed or not executable
    GitMissing,
}

impl RunStatus {
    /// Process exit code: 0, 1, 2 or 3
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
            RunStatus::Denied => 2,
            RunStatus::GitMissing => 3,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Values the pipeline needs from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Repository under review
    pub repo: PathBuf,
    /// Branch compared against the remote
    pub branch: String,
    /// Provider, part of the compliance cache key
    pub provider: Provider,
    /// Model, part of the compliance cache key
    pub model: String,
    /// Language for model answers
    pub language: String,
}

/// Policy evaluator backed by the text-generation provider itself
pub struct LlmPolicyEvaluator<G> {
    generator: G,
    language: String,
}

impl<G: TextGenerator> LlmPolicyEvaluator<G> {
    /// Evaluate policies with `generator`, reporting in `language`
    #[must_use]
    pub fn new(generator: G, language: impl Into<String>) -> Self {
        Self {
            generator,
            language: language.into(),
        }
    }
}

impl<G: TextGenerator> PolicyEvaluator for LlmPolicyEvaluator<G> {
    fn policy_report(&self, provider: &str, model: &str) -> Result<String, GateError> {
        self.generator
            .generate(
                &prompts::policy_report(provider, model, &self.language),
                &roles::DATA_POLICY_ANALYST,
            )
            .map_err(|e| GateError::PolicyReport(e.to_string()))
    }

    fn judge(&self, report: &str) -> Result<String, GateError> {
        self.generator
            .generate(&prompts::lgpd_judgment(report), &roles::LGPD_JUDGE)
            .map_err(|e| GateError::Judgment(e.to_string()))
    }
}

/// Removes the transient input file when dropped, along with its directory
/// when the guard saw it missing
struct InputFile {
    path: PathBuf,
    created_dir: Option<PathBuf>,
}

impl InputFile {
    fn new(path: PathBuf) -> Self {
        let created_dir = path
            .parent()
            .filter(|dir| !dir.exists())
            .map(Path::to_path_buf);
        Self { path, created_dir }
    }
}

impl Drop for InputFile {
    fn drop(&mut self) {
        if self.path.exists()
            && let Err(e) = fs::remove_file(&self.path)
        {
            warn!(path = %self.path.display(), error = %e, "could not remove analysis input");
        }
        if let Some(ref dir) = self.created_dir
            && dir.exists()
            && let Err(e) = fs::remove_dir(dir)
        {
            debug!(path = %dir.display(), error = %e, "work directory left in place");
        }
    }
}

/// Strip surrounding whitespace and backticks from a model answer
#[must_use]
pub fn clean_answer(text: &str) -> String {
    text.trim().replace('`', "")
}

/// Print the authorship summary of `file`; needs no provider
///
/// # Errors
///
/// Returns `PipelineError::Output` if writing to `out` fails.
pub fn authorship<R: GitRunner>(
    runner: &R,
    repo: &Path,
    file: &str,
    out: &mut impl Write,
) -> Result<RunStatus, PipelineError> {
    match blame_summary(runner, repo, file) {
        Outcome::Success(text) => {
            writeln!(out, "{text}")?;
            Ok(RunStatus::Success)
        }
        Outcome::Warning(msg) => {
            warn!(file, "{msg}");
            writeln!(out, "{msg}")?;
            Ok(RunStatus::Success)
        }
        Outcome::Empty => Ok(RunStatus::Success),
        Outcome::Fatal(msg) => {
            error!("{msg}");
            Ok(RunStatus::GitMissing)
        }
    }
}

/// The review pipeline over a text generator and a git runner
pub struct Pipeline<G, R> {
    settings: PipelineSettings,
    generator: G,
    runner: R,
    notifier: Option<Box<dyn Notifier>>,
}

impl<G: TextGenerator, R: GitRunner> Pipeline<G, R> {
    /// Create a pipeline without notifications
    #[must_use]
    pub fn new(settings: PipelineSettings, generator: G, runner: R) -> Self {
        Self {
            settings,
            generator,
            runner,
            notifier: None,
        }
    }

    /// Relay review scores through `notifier`
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The active settings
    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run `command`, writing model output to `out`
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` when the mode's required generation request
    /// fails or `out` cannot be written.
    pub fn run(&self, command: &Command, out: &mut impl Write) -> Result<RunStatus, PipelineError> {
        info!(
            repo = %self.settings.repo.display(),
            branch = %self.settings.branch,
            mode = ?command,
            "starting review"
        );
        match command {
            Command::Lint => self.lint(out),
            Command::Title => self.summarize(out, prompts::pr_title),
            Command::Describe => self.summarize(out, prompts::pr_description),
            Command::Analyze => self.analyze(out),
            Command::Review {
                commits,
                author,
                diff_cap,
            } => {
                let cap = crate::config::Config::review_diff_cap(author.as_deref(), *diff_cap);
                let mut options = CollectOptions::latest(*commits)
                    .on_branch(self.settings.branch.clone())
                    .with_diff_cap(cap);
                if let Some(author) = author {
                    options = options.by_author(author.clone());
                }
                self.review(&options, out)
            }
            Command::Compliance => self.compliance(out),
            Command::Authorship { file } => authorship(&self.runner, &self.settings.repo, file, out),
        }
    }

    /// The compliance verdict for the configured provider/model
    pub fn verdict(&self) -> Verdict {
        let evaluator = LlmPolicyEvaluator::new(&self.generator, self.settings.language.clone());
        let gate = ComplianceGate::new(GatePaths::in_repo(&self.settings.repo), evaluator);
        gate.gate(self.settings.provider.as_str(), &self.settings.model)
    }

    fn cleared(&self) -> bool {
        let verdict = self.verdict();
        if verdict.allows() {
            return true;
        }
        error!(
            provider = %self.settings.provider,
            model = %self.settings.model,
            %verdict,
            "provider not cleared by the LGPD gate, repository content will not be sent"
        );
        false
    }

    fn ask(&self, prompt: &str, role: &roles::Role) -> Result<String, PipelineError> {
        Ok(self.generator.generate(prompt, role)?)
    }

    /// Pre-commit review of the staged diff
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if the request fails or output cannot be written.
    pub fn lint(&self, out: &mut impl Write) -> Result<RunStatus, PipelineError> {
        let collector = PendingCollector::new(&self.runner);
        let diff = match collector.staged_changes(&self.settings.repo) {
            Outcome::Success(diff) => diff,
            Outcome::Empty => {
                writeln!(out, "{NO_ISSUES}")?;
                return Ok(RunStatus::Success);
            }
            Outcome::Warning(msg) => {
                writeln!(out, "{msg}")?;
                return Ok(RunStatus::Success);
            }
            Outcome::Fatal(msg) => {
                error!("{msg}");
                return Ok(RunStatus::GitMissing);
            }
        };

        if !self.cleared() {
            return Ok(RunStatus::Denied);
        }
        let answer = self.ask(
            &prompts::lint(&diff, &self.settings.language),
            &roles::QUALITY_CONSULTANT,
        )?;
        writeln!(out, "{}", clean_answer(&answer))?;
        Ok(RunStatus::Success)
    }

    /// Collect the pending changes, `Err(status)` when the mode should stop
    fn pending_input(&self) -> Result<String, RunStatus> {
        let path = self.settings.repo.join(WORK_DIR).join(INPUT_FILE);
        let _cleanup = InputFile::new(path.clone());
        let collector = PendingCollector::new(&self.runner);
        match collector.write_input(&self.settings.repo, &path, &self.settings.branch) {
            Outcome::Success(text) => Ok(text),
            Outcome::Empty => {
                info!(branch = %self.settings.branch, "nothing to analyze");
                Err(RunStatus::Success)
            }
            Outcome::Warning(msg) => {
                warn!("{msg}");
                Err(RunStatus::Success)
            }
            Outcome::Fatal(msg) => {
                error!("{msg}");
                Err(RunStatus::GitMissing)
            }
        }
    }

    fn summarize(
        &self,
        out: &mut impl Write,
        prompt: fn(&str, &str) -> String,
    ) -> Result<RunStatus, PipelineError> {
        let changes = match self.pending_input() {
            Ok(changes) => changes,
            Err(status) => return Ok(status),
        };
        if !self.cleared() {
            return Ok(RunStatus::Denied);
        }
        let answer = self.ask(
            &prompt(&changes, &self.settings.language),
            &roles::SUMMARY_SPECIALIST,
        )?;
        writeln!(out, "{}", clean_answer(&answer))?;
        Ok(RunStatus::Success)
    }

    /// Multi-step analysis of the pending changes
    ///
    /// Each step's answer is saved under `<repo>/analyses-completed/`; a
    /// failed step is logged and skipped. The executive summary is printed.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Output` if output cannot be written.
    pub fn analyze(&self, out: &mut impl Write) -> Result<RunStatus, PipelineError> {
        let changes = match self.pending_input() {
            Ok(changes) => changes,
            Err(status) => return Ok(status),
        };
        if !self.cleared() {
            return Ok(RunStatus::Denied);
        }

        let sink = ReportSink::in_repo(&self.settings.repo);
        let language = self.settings.language.as_str();
        let mut findings: Vec<(String, String)> = Vec::new();

        for step in &ANALYSIS_STEPS {
            let prompt = prompts::analysis_step(step, &changes, &findings, language);
            match self.generator.generate(&prompt, &step.role) {
                Ok(text) => {
                    self.save(&sink, step.file_name, &text);
                    findings.push((step.name.to_string(), text));
                }
                Err(e) => warn!(step = step.name, error = %e, "analysis step failed, skipping"),
            }
        }

        match self
            .generator
            .generate(&prompts::mentoring(&findings, language), &roles::CODE_MENTOR)
        {
            Ok(text) => self.save(&sink, MENTORING_FILE, &text),
            Err(e) => warn!(error = %e, "mentoring step failed, skipping"),
        }

        match self.generator.generate(
            &prompts::executive_summary(&findings, language),
            &roles::SUMMARY_SPECIALIST,
        ) {
            Ok(summary) => {
                writeln!(out, "{}", clean_answer(&summary))?;
                Ok(RunStatus::Success)
            }
            Err(e) => {
                error!(error = %e, "executive summary failed");
                Ok(RunStatus::Failure)
            }
        }
    }

    fn save(&self, sink: &ReportSink, file_name: &str, text: &str) {
        match sink.write(file_name, text) {
            Ok(path) => info!(path = %path.display(), "report saved"),
            Err(e) => warn!(error = %e, "could not save report"),
        }
    }

    /// Scored review of recent commits, then the optional notification
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if the review request fails or output cannot
    /// be written.
    pub fn review(
        &self,
        options: &CollectOptions,
        out: &mut impl Write,
    ) -> Result<RunStatus, PipelineError> {
        let collector = HistoryCollector::new(&self.runner);
        let transcript = match collector.collect(&self.settings.repo, options) {
            Outcome::Success(text) => text,
            Outcome::Empty => return Ok(RunStatus::Success),
            Outcome::Warning(msg) => {
                warn!("{msg}");
                writeln!(out, "{msg}")?;
                return Ok(RunStatus::Success);
            }
            Outcome::Fatal(msg) => {
                error!("{msg}");
                return Ok(RunStatus::GitMissing);
            }
        };

        if !self.cleared() {
            return Ok(RunStatus::Denied);
        }
        let review = self.ask(
            &prompts::code_review(&transcript, &self.settings.language),
            &roles::CODE_REVIEWER,
        )?;
        let sink = ReportSink::in_repo(&self.settings.repo);
        self.save(&sink, CODE_REVIEW_FILE, &review);
        writeln!(out, "{}", review.trim())?;

        self.notify(&review, options.author_email.as_deref());
        Ok(RunStatus::Success)
    }

    fn notify(&self, review: &str, author: Option<&str>) {
        let Some(ref notifier) = self.notifier else {
            warn!("Telegram not configured (TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID), skipping notification");
            return;
        };
        let evaluation = Evaluation::parse(review);
        info!(score = evaluation.score, "review evaluated");

        let developer = author
            .map(str::to_string)
            .unwrap_or_else(|| acting_identity(&self.settings.repo));
        let repository = repository_name(&self.settings.repo);
        let message = review_message(&evaluation, &developer, &repository, Local::now());
        if !notifier.send(&message, ParseMode::Markdown) {
            warn!("manager notification was not delivered");
        }
    }

    /// Run the gate alone and print the verdict
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Output` if output cannot be written.
    pub fn compliance(&self, out: &mut impl Write) -> Result<RunStatus, PipelineError> {
        let verdict = self.verdict();
        writeln!(
            out,
            "LGPD verdict for {}/{}: {verdict}",
            self.settings.provider, self.settings.model
        )?;
        Ok(if verdict.allows() {
            RunStatus::Success
        } else {
            RunStatus::Denied
        })
    }
}

/// Directory name of the repository, resolving `.`
fn repository_name(repo: &Path) -> String {
    let resolved = repo.canonicalize().unwrap_or_else(|_| repo.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| resolved.display().to_string())
}
