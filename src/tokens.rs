//! Token accounting: a word-count estimator and a simple budget tracker.
//!
//! Neither is tokenizer-accurate. [`estimate`] is the heuristic used for the
//! `tokens` field of every manifest entry; [`TokenBudget`] is a plain counter
//! for context-window bookkeeping and shares nothing with the build pipeline.

use std::fmt;

/// Tokens per whitespace-separated word.
pub const DEFAULT_RATIO: f64 = 1.3;

/// Estimate the token count of `text` with the default ratio.
pub fn estimate(text: &str) -> u64 {
    estimate_with_ratio(text, DEFAULT_RATIO)
}

/// Word count multiplied by `ratio`, truncated toward zero.
pub fn estimate_with_ratio(text: &str, ratio: f64) -> u64 {
    let words = text.split_whitespace().count();
    (words as f64 * ratio) as u64
}

/// Running token budget with a fixed limit.
///
/// `remaining` is not clamped: reclaiming more than was consumed drives
/// `used` below zero. Arithmetic saturates at the `i64` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    limit: i64,
    used: i64,
}

impl TokenBudget {
    pub fn new(limit: i64) -> Self {
        Self { limit, used: 0 }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn used(&self) -> i64 {
        self.used
    }

    pub fn remaining(&self) -> i64 {
        self.limit.saturating_sub(self.used)
    }

    pub fn can_fit(&self, tokens: i64) -> bool {
        tokens <= self.remaining()
    }

    /// Consume `tokens` if they fit. Returns `false` and leaves the budget
    /// untouched otherwise.
    pub fn consume(&mut self, tokens: i64) -> bool {
        if !self.can_fit(tokens) {
            return false;
        }
        self.used = self.used.saturating_add(tokens);
        true
    }

    /// Replace content of `original` tokens with a `summary`, giving back the
    /// difference. Returns the amount reclaimed.
    pub fn reclaim(&mut self, original: i64, summary: i64) -> i64 {
        let reclaimed = original.saturating_sub(summary);
        self.used = self.used.saturating_sub(reclaimed);
        reclaimed
    }
}

impl fmt::Display for TokenBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.used, self.limit)
    }
}
