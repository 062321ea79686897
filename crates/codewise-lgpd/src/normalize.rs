// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Line normalization shared by the cache key and the verdict parser
//!
//! Model output arrives as markdown. A line is compared after trimming,
//! lowercasing and removing emphasis, heading, quote, code and
//! strikethrough characters, so `**Sim**` and `# sim` both read as `sim`.

/// Markdown characters removed before comparing a line
pub const MARKUP_CHARS: [char; 6] = ['*', '_', '#', '>', '`', '~'];

/// Trim, lowercase, drop [`MARKUP_CHARS`] and trim again
#[must_use]
pub fn normalize_line(line: &str) -> String {
    let stripped: String = line
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .collect();
    stripped.trim().to_string()
}

/// The cache key for a provider/model pair: both parts normalized, concatenated
#[must_use]
pub fn provider_model_key(provider: &str, model: &str) -> String {
    format!("{}{}", normalize_line(provider), normalize_line(model))
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Normalizing twice is the same as normalizing once
        #[test]
        fn prop_normalize_idempotent(line in "[ -~ãáéíóõúçÃÁÉÍÓÕÚÇ\t]{0,80}") {
            let once = normalize_line(&line);
            prop_assert_eq!(normalize_line(&once), once);
        }

        /// The result never contains a markup character
        #[test]
        fn prop_no_markup_left(line in "[ -~ãáéíóõúçÃÁÉÍÓÕÚÇ\t]{0,80}") {
            let out = normalize_line(&line);
            prop_assert!(!out.chars().any(|c| MARKUP_CHARS.contains(&c)));
        }
    }
}
