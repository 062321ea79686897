// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Compliance verdicts and the first-match verdict parser

use std::fmt;

use crate::normalize::normalize_line;

/// Normalized lines read as an affirmative verdict
pub const YES_TOKENS: [&str; 2] = ["yes", "sim"];

/// Normalized lines read as a negative verdict
pub const NO_TOKENS: [&str; 3] = ["no", "não", "nao"];

/// Outcome of a compliance judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The provider's policy meets the bar
    Yes,
    /// The provider's policy does not meet the bar
    No,
    /// No line of the judgment was a verdict token
    Undetermined,
}

impl Verdict {
    /// Whether repository content may be transmitted.
    ///
    /// Only `Yes` allows; `Undetermined` fails closed.
    #[must_use]
    pub fn allows(self) -> bool {
        matches!(self, Verdict::Yes)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Yes => write!(f, "yes"),
            Verdict::No => write!(f, "no"),
            Verdict::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Scan `text` top to bottom and return the first verdict token found.
///
/// A line counts only when it normalizes to exactly a token, so prose that
/// merely contains "yes" is ignored.
#[must_use]
pub fn parse_verdict(text: &str) -> Verdict {
    for line in text.lines() {
        let token = normalize_line(line);
        if YES_TOKENS.contains(&token.as_str()) {
            return Verdict::Yes;
        }
        if NO_TOKENS.contains(&token.as_str()) {
            return Verdict::No;
        }
    }
    Verdict::Undetermined
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Prefixing a verdict line fixes the result regardless of what follows
        #[test]
        fn prop_leading_token_decides(rest in "[a-zA-Z \n]{0,200}", yes in any::<bool>()) {
            let head = if yes { "**Yes**" } else { "> No" };
            let expected = if yes { Verdict::Yes } else { Verdict::No };
            prop_assert_eq!(parse_verdict(&format!("{head}\n{rest}")), expected);
        }

        /// Text without verdict-token lines is undetermined
        #[test]
        fn prop_digits_only_undetermined(text in "[0-9 \n]{0,200}") {
            prop_assert_eq!(parse_verdict(&text), Verdict::Undetermined);
        }
    }
}
