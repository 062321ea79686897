// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Text generation over provider HTTP APIs
//!
//! The pipeline only needs "send this prompt in this role, get text back",
//! expressed by [`TextGenerator`]. [`HttpGenerator`] implements it with a
//! blocking `reqwest` client:
//!
//! - OpenAI and Groq: `POST {base}/v1/chat/completions` (OpenAI-compatible)
//! - Google: `POST {base}/v1beta/models/{model}:generateContent`
//! - Cohere: `POST {base}/v2/chat`
//!
//! Requests are non-streaming and bounded by the configured timeout.

use std::fmt;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use reqwest::blocking::Client;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::LlmError;
use crate::roles::Role;

/// Sampling temperature sent with every request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default request timeout
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

const SNIPPET_CHARS: usize = 300;

/// Supported text-generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
#[value(rename_all = "lower")]
pub enum Provider {
    /// Google Gemini
    #[default]
    #[value(alias = "gemini")]
    Google,
    /// OpenAI
    #[value(name = "openai")]
    OpenAi,
    /// Groq (OpenAI-compatible API)
    Groq,
    /// Cohere
    Cohere,
}

impl Provider {
    /// Lowercase identifier, also used in the compliance cache key
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Cohere => "cohere",
        }
    }

    /// Model used when none is configured
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Google => "gemini-2.0-flash",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.3-70b-versatile",
            Provider::Cohere => "command-r-plus",
        }
    }

    /// Provider-specific environment variable holding the API key
    #[must_use]
    pub fn api_key_variable(self) -> &'static str {
        match self {
            Provider::Google => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Cohere => "COHERE_API_KEY",
        }
    }

    /// Public API base URL
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::Google => "https://generativelanguage.googleapis.com",
            Provider::OpenAi => "https://api.openai.com",
            Provider::Groq => "https://api.groq.com/openai",
            Provider::Cohere => "https://api.cohere.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that turns a prompt into text
pub trait TextGenerator {
    /// Generate a response to `prompt`, speaking as `role`
    ///
    /// # Errors
    ///
    /// Returns `LlmError` when the request fails or yields no text.
    fn generate(&self, prompt: &str, role: &Role) -> Result<String, LlmError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, prompt: &str, role: &Role) -> Result<String, LlmError> {
        (**self).generate(prompt, role)
    }
}

/// Connection settings for [`HttpGenerator`]
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    /// Provider to call
    pub provider: Provider,
    /// Model identifier
    pub model: String,
    /// API key
    pub api_key: String,
    /// Base URL override (proxies, tests)
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmSettings {
    /// Settings with the provider's defaults for everything but the key
    #[must_use]
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: api_key.into(),
            base_url: None,
            timeout: DEFAULT_LLM_TIMEOUT,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Use a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint a generation request is posted to (no credentials)
    #[must_use]
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/');
        match self.provider {
            Provider::Google => format!("{base}/v1beta/models/{}:generateContent", self.model),
            Provider::OpenAi | Provider::Groq => format!("{base}/v1/chat/completions"),
            Provider::Cohere => format!("{base}/v2/chat"),
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Blocking HTTP client for the configured provider
#[derive(Debug)]
pub struct HttpGenerator {
    client: Client,
    settings: LlmSettings,
    url: String,
}

impl HttpGenerator {
    /// Build a client from `settings`
    ///
    /// # Errors
    ///
    /// - `LlmError::MissingApiKey` if the key is blank
    /// - `LlmError::InvalidEndpoint` if the base URL is not http(s)
    /// - `LlmError::Transport` if the HTTP client cannot be built
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                provider: settings.provider.to_string(),
                variable: settings.provider.api_key_variable().to_string(),
            });
        }

        let url = settings.endpoint();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(LlmError::InvalidEndpoint(url));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if settings.provider != Provider::Google {
            let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
                .map_err(|e| LlmError::Decode(format!("invalid API key header: {e}")))?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Transport(e.without_url()))?;

        info!(
            provider = %settings.provider,
            model = %settings.model,
            timeout_secs = settings.timeout.as_secs(),
            "text generation client initialized"
        );

        Ok(Self {
            client,
            settings,
            url,
        })
    }

    /// The active settings
    #[must_use]
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn post<B: Serialize>(&self, body: &B) -> Result<reqwest::blocking::Response, LlmError> {
        let mut request = self.client.post(&self.url).json(body);
        if self.settings.provider == Provider::Google {
            request = request.query(&[("key", self.settings.api_key.as_str())]);
        }
        let resp = request
            .send()
            .map_err(|e| LlmError::Transport(e.without_url()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let snippet = make_snippet(&resp.text().unwrap_or_default());
            error!(status, url = %self.url, %snippet, "provider returned non-success status");
            return Err(LlmError::HttpStatus {
                status,
                url: self.url.clone(),
                snippet,
            });
        }
        Ok(resp)
    }

    fn chat_completion(&self, prompt: &str, role: &Role) -> Result<String, LlmError> {
        let system = role.system_prompt();
        let body = ChatCompletionRequest::new(
            &self.settings.model,
            &system,
            prompt,
            self.settings.temperature,
        );
        let out: ChatCompletionResponse = self
            .post(&body)?
            .json()
            .map_err(|e| LlmError::Decode(format!("{e}; expected `choices[0].message.content`")))?;
        out.into_text()
    }

    fn cohere_chat(&self, prompt: &str, role: &Role) -> Result<String, LlmError> {
        let system = role.system_prompt();
        let body = ChatCompletionRequest::new(
            &self.settings.model,
            &system,
            prompt,
            self.settings.temperature,
        );
        let out: CohereChatResponse = self
            .post(&body)?
            .json()
            .map_err(|e| LlmError::Decode(format!("{e}; expected `message.content[].text`")))?;
        out.into_text()
    }

    fn generate_content(&self, prompt: &str, role: &Role) -> Result<String, LlmError> {
        let system = role.system_prompt();
        let body = GenerateContentRequest::new(&system, prompt, self.settings.temperature);
        let out: GenerateContentResponse = self.post(&body)?.json().map_err(|e| {
            LlmError::Decode(format!("{e}; expected `candidates[0].content.parts[].text`"))
        })?;
        out.into_text()
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&self, prompt: &str, role: &Role) -> Result<String, LlmError> {
        let started = Instant::now();
        debug!(
            provider = %self.settings.provider,
            model = %self.settings.model,
            role = role.id,
            prompt_chars = prompt.chars().count(),
            "POST {}", self.url
        );

        let text = match self.settings.provider {
            Provider::Google => self.generate_content(prompt, role),
            Provider::OpenAi | Provider::Groq => self.chat_completion(prompt, role),
            Provider::Cohere => self.cohere_chat(prompt, role),
        }?;

        info!(
            role = role.id,
            latency_ms = started.elapsed().as_millis(),
            response_chars = text.chars().count(),
            "generation completed"
        );
        Ok(text)
    }
}

/// First characters of an error body, whitespace collapsed
fn make_snippet(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &collapsed[..idx]),
        None => collapsed,
    }
}

// ============================================================================
// OpenAI-compatible payloads (the Cohere v2 request has the same shape)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, system: &'a str, prompt: &'a str, temperature: f32) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

// ============================================================================
// Cohere payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct CohereChatResponse {
    #[serde(default)]
    message: Option<CohereMessage>,
}

#[derive(Debug, Deserialize)]
struct CohereMessage {
    #[serde(default)]
    content: Vec<CohereContent>,
}

#[derive(Debug, Deserialize)]
struct CohereContent {
    #[serde(default)]
    text: Option<String>,
}

impl CohereChatResponse {
    fn into_text(self) -> Result<String, LlmError> {
        let text: String = self
            .message
            .map(|m| m.content.into_iter().filter_map(|c| c.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            Err(LlmError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

// ============================================================================
// Gemini payloads
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system: &'a str, prompt: &'a str, temperature: f32) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, LlmError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            Err(LlmError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}
