//! Selector resolution with ordered fallback chains
//!
//! Third-party portal DOMs offer no stable contract, so every form control is
//! located through a prioritized list of guesses. Each chain is plain data:
//! strategies run in order, the first success wins, and the outcome records
//! exactly how far the chain got.

use std::fmt;
use std::time::Duration;

use crate::booking::page::PortalPage;

/// One strategy for locating an interactive control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Form-label lookup ("Email", "Password")
    Label(&'static str),
    /// CSS / attribute lookup
    Css(&'static str),
    /// Visible-text lookup
    Text(&'static str),
}

impl Selector {
    /// Playwright-style query string understood by the browser driver.
    pub fn to_query(&self) -> String {
        match self {
            Selector::Label(label) => format!("label={}", label),
            Selector::Css(css) => (*css).to_string(),
            Selector::Text(text) => format!("text={}", text),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// Username field candidates, in priority order.
pub const USERNAME_FIELDS: &[Selector] = &[
    Selector::Label("Email"),
    Selector::Css(r#"input[name="email"]"#),
    Selector::Css(r#"input[type="email"]"#),
];

/// Password field candidates, in priority order.
pub const PASSWORD_FIELDS: &[Selector] = &[
    Selector::Label("Password"),
    Selector::Css(r#"input[name="password"]"#),
    Selector::Css(r#"input[type="password"]"#),
];

/// Login submit candidates. When all five miss, the caller falls back to an
/// Enter keypress on the focused field.
pub const LOGIN_BUTTONS: &[Selector] = &[
    Selector::Css(r#"button:has-text("Sign in")"#),
    Selector::Css(r#"button:has-text("Log in")"#),
    Selector::Css(r#"button[type="submit"]"#),
    Selector::Text("Sign in"),
    Selector::Text("Log in"),
];

/// Booking submit candidates. No keypress fallback here.
pub const SUBMIT_BUTTONS: &[Selector] = &[
    Selector::Css(r#"button:has-text("Book")"#),
    Selector::Css(r#"button:has-text("Reserve")"#),
    Selector::Text("Book"),
    Selector::Text("Reserve"),
];

/// Result of evaluating a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainOutcome {
    /// How many strategies were invoked
    pub attempted: usize,
    /// Index of the winning strategy, if any
    pub winner: Option<usize>,
}

impl ChainOutcome {
    pub fn succeeded(&self) -> bool {
        self.winner.is_some()
    }
}

/// Try each fill strategy in order until one succeeds.
pub async fn try_fill(page: &dyn PortalPage, chain: &[Selector], value: &str) -> ChainOutcome {
    for (index, selector) in chain.iter().enumerate() {
        match page.fill(selector, value).await {
            Ok(()) => {
                return ChainOutcome {
                    attempted: index + 1,
                    winner: Some(index),
                }
            }
            Err(err) => {
                tracing::trace!(selector = %selector, %err, "fill strategy missed");
            }
        }
    }
    ChainOutcome {
        attempted: chain.len(),
        winner: None,
    }
}

/// Try each click strategy in order until one succeeds, each attempt bounded
/// by `per_attempt_timeout`.
pub async fn try_click(
    page: &dyn PortalPage,
    chain: &[Selector],
    per_attempt_timeout: Duration,
) -> ChainOutcome {
    for (index, selector) in chain.iter().enumerate() {
        match page.click(selector, per_attempt_timeout).await {
            Ok(()) => {
                return ChainOutcome {
                    attempted: index + 1,
                    winner: Some(index),
                }
            }
            Err(err) => {
                tracing::trace!(selector = %selector, %err, "click strategy missed");
            }
        }
    }
    ChainOutcome {
        attempted: chain.len(),
        winner: None,
    }
}

/// Normalize a dropdown option label for room-code matching.
///
/// Case, spacing, and dash variants are all insignificant: "2-L", "2 l", and
/// "2–L" collapse to the same key.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '\u{2013}' | '\u{2014}'))
        .flat_map(char::to_lowercase)
        .collect()
}
