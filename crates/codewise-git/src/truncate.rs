// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Size bounds for text handed to a prompt
//!
//! Caps are measured in characters (Unicode scalar values), so an excerpt
//! never ends in the middle of a multi-byte sequence.

/// Per-commit patch cap used by the full history transcript
pub const DEFAULT_DIFF_CAP: usize = 3000;

/// Per-commit patch cap used when the listing is filtered by author
pub const AUTHOR_DIFF_CAP: usize = 2000;

/// Ceiling for the consolidated diff written by the pending-changes input
pub const DEFAULT_PENDING_DIFF_CAP: usize = 200_000;

/// Return the first `max_chars` characters of `text`.
///
/// Idempotent: truncating an excerpt again with the same cap returns it
/// unchanged.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Whether [`truncate_chars`] would shorten `text`
#[must_use]
pub fn exceeds(text: &str, max_chars: usize) -> bool {
    text.char_indices().nth(max_chars).is_some()
}
