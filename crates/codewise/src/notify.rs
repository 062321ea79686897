// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Manager notification after a scored code review
//!
//! The review text is reduced to a score and a short justification, then
//! relayed to a Telegram chat. Delivery is optional: every failure is
//! logged and reported as `false`, never raised.

use std::time::Duration;

use chrono::{DateTime, Local};
use codewise_lgpd::MARKUP_CHARS;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::NotifyError;

/// Longest justification relayed, in characters
pub const MAX_JUSTIFICATION_CHARS: usize = 4000;

/// Text used when the review has no breakdown section
pub const DEFAULT_JUSTIFICATION: &str = "Review completed.";

/// Telegram Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

const SCORE_MARKERS: [&str; 2] = ["final score", "nota final"];
const BREAKDOWN_MARKERS: [&str; 2] = ["score breakdown", "breakdown de pontos"];
const END_MARKERS: [&str; 2] = ["end of justification", "fim justificativa"];

/// Formatting mode of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Legacy Telegram Markdown
    Markdown,
    /// Plain text
    Plain,
}

impl ParseMode {
    /// Value of the `parse_mode` field, `None` for plain text
    #[must_use]
    pub fn api_value(self) -> Option<&'static str> {
        match self {
            ParseMode::Markdown => Some("Markdown"),
            ParseMode::Plain => None,
        }
    }
}

/// A chat-message delivery capability
pub trait Notifier {
    /// Deliver `text`; `true` when the message was accepted
    fn send(&self, text: &str, mode: ParseMode) -> bool;
}

/// Score and justification extracted from a review
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Score out of 10, 0 when absent
    pub score: f64,
    /// Breakdown lines, markup removed, possibly empty
    pub justification: String,
}

fn strip_markup(line: &str) -> String {
    line.chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// First decimal number in `text` (`8`, `8.5`, `10.`)
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let mut end = int_len;
    if rest[int_len..].starts_with('.') {
        let frac = &rest[int_len + 1..];
        end += 1 + frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
    }
    rest[..end].trim_end_matches('.').parse().ok()
}

fn cap_chars(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

impl Evaluation {
    /// Extract the score and justification from a review.
    ///
    /// The score is the first number on the last line mentioning the final
    /// score that carries one. The justification is every non-blank line between the
    /// breakdown marker and the end marker.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut score: Option<f64> = None;
        let mut lines = Vec::new();
        let mut capturing = false;

        for raw in text.lines() {
            let line = raw.trim();
            let lower = line.to_lowercase();

            if contains_any(&lower, &SCORE_MARKERS)
                && let Some(found) = first_number(&strip_markup(line))
            {
                score = Some(found);
            }
            if contains_any(&lower, &BREAKDOWN_MARKERS) {
                capturing = true;
                continue;
            }
            if capturing && contains_any(&lower, &END_MARKERS) {
                break;
            }
            if capturing {
                let clean = strip_markup(line);
                if !clean.is_empty() {
                    lines.push(clean);
                }
            }
        }

        Self {
            score: score.unwrap_or(0.0),
            justification: cap_chars(lines.join("\n"), MAX_JUSTIFICATION_CHARS),
        }
    }

    /// 🟢 from 8.5, 🟡 from 7.0, 🔴 below
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        if self.score >= 8.5 {
            "🟢"
        } else if self.score >= 7.0 {
            "🟡"
        } else {
            "🔴"
        }
    }
}

/// Escape the characters legacy Telegram Markdown treats as markup
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '[' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the chat message for a review
#[must_use]
pub fn review_message(
    evaluation: &Evaluation,
    developer: &str,
    repository: &str,
    at: DateTime<Local>,
) -> String {
    let justification = if evaluation.justification.is_empty() {
        DEFAULT_JUSTIFICATION
    } else {
        evaluation.justification.as_str()
    };
    format!(
        "{emoji} *New Code Review*\n\n\
         👤 *Developer:* {developer}\n\
         📦 *Repository:* {repository}\n\
         📊 *Score:* {score:.1}/10\n\n\
         📝 *Summary:*\n{justification}\n\n\
         📅 *Date:* {date}\n",
        emoji = evaluation.emoji(),
        developer = escape_markdown(developer),
        repository = escape_markdown(repository),
        score = evaluation.score,
        justification = escape_markdown(justification),
        date = at.format("%d/%m/%Y %H:%M"),
    )
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Telegram bot delivering to one chat
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramNotifier {
    /// A notifier for `chat_id` using the bot `token`
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Transport` if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(TELEGRAM_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.without_url()))?;
        Ok(Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn try_send(&self, text: &str, mode: ParseMode) -> Result<(), NotifyError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        );
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: mode.api_value(),
        };
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| NotifyError::Transport(e.without_url()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::HttpStatus(resp.status().as_u16()))
        }
    }
}

impl Notifier for TelegramNotifier {
    /// Markdown the API cannot parse is answered with HTTP 400; the message
    /// is then resent as plain text.
    fn send(&self, text: &str, mode: ParseMode) -> bool {
        let result = match self.try_send(text, mode) {
            Err(NotifyError::HttpStatus(400)) if mode == ParseMode::Markdown => {
                warn!("chat API rejected the markup, resending as plain text");
                self.try_send(text, ParseMode::Plain)
            }
            other => other,
        };
        match result {
            Ok(()) => {
                info!("notification sent via Telegram");
                true
            }
            Err(e) => {
                warn!(error = %e, "could not send Telegram notification");
                false
            }
        }
    }
}
