// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! codewise-lgpd: data-retention compliance gate
//!
//! Before repository content is sent to a language-model provider, the
//! provider's data policy is assessed and judged against the LGPD. The
//! assessment is costly, so the result is cached on disk per
//! provider/model pair in two plain files:
//!
//! - `policy-report.md`: the assessment, whose first line is the cache key
//! - `verdict.md`: the judgment, whose first yes/no line is the verdict
//!
//! Any verdict other than [`Verdict::Yes`] must stop the caller from
//! transmitting repository content.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use codewise_lgpd::{ComplianceGate, GatePaths, PolicyEvaluator, GateError};
//!
//! struct Offline;
//!
//! impl PolicyEvaluator for Offline {
//!     fn policy_report(&self, _provider: &str, _model: &str) -> Result<String, GateError> {
//!         Ok("retains prompts for 30 days".to_string())
//!     }
//!     fn judge(&self, _report: &str) -> Result<String, GateError> {
//!         Ok("No".to_string())
//!     }
//! }
//!
//! let gate = ComplianceGate::new(GatePaths::in_repo("."), Offline);
//! if !gate.gate("google", "gemini-2.0-flash").allows() {
//!     eprintln!("provider not cleared for repository content");
//! }
//! ```

pub mod error;
pub mod gate;
pub mod normalize;
pub mod verdict;

pub use error::GateError;
pub use gate::{ComplianceGate, GatePaths, PolicyEvaluator, has_cached_verdict, read_verdict};
pub use normalize::{MARKUP_CHARS, normalize_line, provider_model_key};
pub use verdict::{Verdict, parse_verdict};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::GateError;
    pub use crate::gate::{ComplianceGate, GatePaths, PolicyEvaluator};
    pub use crate::verdict::Verdict;
}
