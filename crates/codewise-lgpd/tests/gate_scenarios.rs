// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! End-to-end behaviour of the compliance gate against a counting evaluator

use std::cell::Cell;
use std::fs;

use codewise_lgpd::prelude::*;
use codewise_lgpd::{has_cached_verdict, provider_model_key};
use similar_asserts::assert_eq;
use tempfile::TempDir;

/// Evaluator returning canned text and counting every call
struct CountingEvaluator {
    report: String,
    judgment: String,
    fail_judgment: bool,
    report_calls: Cell<usize>,
    judge_calls: Cell<usize>,
}

impl CountingEvaluator {
    fn new(report: &str, judgment: &str) -> Self {
        Self {
            report: report.to_string(),
            judgment: judgment.to_string(),
            fail_judgment: false,
            report_calls: Cell::new(0),
            judge_calls: Cell::new(0),
        }
    }

    fn failing_judgment(mut self) -> Self {
        self.fail_judgment = true;
        self
    }

    fn evaluations(&self) -> usize {
        self.report_calls.get()
    }
}

impl PolicyEvaluator for CountingEvaluator {
    fn policy_report(&self, _provider: &str, _model: &str) -> Result<String, GateError> {
        self.report_calls.set(self.report_calls.get() + 1);
        Ok(self.report.clone())
    }

    fn judge(&self, _report: &str) -> Result<String, GateError> {
        self.judge_calls.set(self.judge_calls.get() + 1);
        if self.fail_judgment {
            return Err(GateError::Judgment("provider unavailable".into()));
        }
        Ok(self.judgment.clone())
    }
}

#[test]
fn test_cached_sim_verdict_skips_evaluation() {
    let repo = TempDir::new().expect("tempdir");
    let paths = GatePaths::in_repo(repo.path());
    fs::create_dir_all(paths.policy.parent().expect("parent")).expect("mkdir");
    fs::write(&paths.policy, "googlegemini-2.0-flash\nRetention details...\n").expect("policy");
    fs::write(&paths.verdict, "Sim\nJustification follows.\n").expect("verdict");

    let evaluator = CountingEvaluator::new("unused", "No");
    let gate = ComplianceGate::new(paths, &evaluator);

    assert_eq!(gate.gate("google", "gemini-2.0-flash"), Verdict::Yes);
    assert_eq!(evaluator.evaluations(), 0);
    assert_eq!(evaluator.judge_calls.get(), 0);
}

#[test]
fn test_evaluate_then_gate_calls_evaluator_once() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("Provider keeps prompts for 30 days.", "**No**\nReason: retention.");
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    let first = gate.evaluate_and_cache("openai", "gpt-4o-mini");
    let second = gate.gate("openai", "gpt-4o-mini");

    assert_eq!(first, Verdict::No);
    assert_eq!(second, first);
    assert_eq!(evaluator.evaluations(), 1);
    assert_eq!(evaluator.judge_calls.get(), 1);
}

#[test]
fn test_written_policy_leads_with_key() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("Data policy summary", "yes");
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    assert_eq!(gate.gate("Groq", "llama-3.3-70b-versatile"), Verdict::Yes);

    let policy = fs::read_to_string(&gate.paths().policy).expect("policy written");
    let first_line = policy.lines().next().expect("non-empty");
    assert_eq!(first_line, provider_model_key("Groq", "llama-3.3-70b-versatile"));
    assert!(policy.contains("Data policy summary"));
    assert_eq!(fs::read_to_string(&gate.paths().verdict).expect("verdict"), "yes");
}

#[test]
fn test_switching_model_reevaluates() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("report", "sim");
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    gate.gate("google", "gemini-2.0-flash");
    gate.gate("google", "gemini-2.0-flash");
    gate.gate("google", "gemini-1.5-pro");

    assert_eq!(evaluator.evaluations(), 2);
}

#[test]
fn test_failed_judgment_writes_nothing_and_denies() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("report", "yes").failing_judgment();
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    let verdict = gate.gate("google", "gemini-2.0-flash");

    assert_eq!(verdict, Verdict::Undetermined);
    assert!(!verdict.allows());
    assert!(!gate.paths().policy.exists());
    assert!(!gate.paths().verdict.exists());
}

#[test]
fn test_undetermined_judgment_is_cached_but_denies() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("report", "It depends on the contract.");
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    assert_eq!(gate.gate("openai", "gpt-4o"), Verdict::Undetermined);
    assert_eq!(gate.gate("openai", "gpt-4o"), Verdict::Undetermined);
    assert_eq!(evaluator.evaluations(), 1);
}

#[test]
fn test_missing_verdict_file_forces_reevaluation() {
    let repo = TempDir::new().expect("tempdir");
    let evaluator = CountingEvaluator::new("report", "yes");
    let gate = ComplianceGate::new(GatePaths::in_repo(repo.path()), &evaluator);

    gate.gate("google", "gemini-2.0-flash");
    fs::remove_file(&gate.paths().verdict).expect("remove verdict");
    let paths = gate.paths();
    assert!(!has_cached_verdict(&paths.policy, &paths.verdict, "google", "gemini-2.0-flash"));

    assert_eq!(gate.gate("google", "gemini-2.0-flash"), Verdict::Yes);
    assert_eq!(evaluator.evaluations(), 2);
}
