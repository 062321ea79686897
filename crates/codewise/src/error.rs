// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Error types for the review pipeline and its external collaborators

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the text-generation client
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured for the provider
    #[error("no API key configured for provider '{provider}' (set {variable} or CODEWISE_API_KEY)")]
    MissingApiKey {
        /// Provider name
        provider: String,
        /// Environment variable expected to hold the key
        variable: String,
    },

    /// The configured endpoint is not an http(s) URL
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Network or client failure (URL stripped, it may carry the key)
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// The provider answered with a non-success status
    #[error("provider returned HTTP {status} for {url}: {snippet}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Request URL without query string
        url: String,
        /// Start of the response body
        snippet: String,
    },

    /// The response body did not have the expected shape
    #[error("could not decode provider response: {0}")]
    Decode(String),

    /// The provider returned no text
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// Errors from the chat notification sink
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network or client failure (URL stripped, it carries the bot token)
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// The chat API answered with a non-success status
    #[error("chat API returned HTTP {0}")]
    HttpStatus(u16),
}

/// Errors writing report files
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report directory could not be created
    #[error("could not create report directory {path}: {source}")]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A report file could not be written
    #[error("could not write report {path}: {source}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Errors that abort a pipeline mode
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The single required generation request of the mode failed
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),

    /// Writing to the output stream failed
    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}
