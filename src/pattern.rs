//! # Pattern Evaluator
//!
//! Interprets the constrained pattern language accepted by the `random`
//! command and produces a pseudo-random result.
//!
//! A pattern is classified against exactly one of two grammars, tried in
//! fixed order:
//!
//! 1. **Range**: `<int>-<int>`, both non-negative decimal integers with no
//!    sign or interior whitespace. A draw is uniform over `[min, max)`.
//! 2. **Choice list**: tokens separated by `|`. Tokens are trimmed of
//!    surrounding whitespace and empty tokens are discarded; the list needs
//!    at least two usable tokens. One token is selected uniformly.
//!
//! Anything else evaluates to [`EvaluationResult::Invalid`]: a bare token
//! without a delimiter, a list that trims down to fewer than two tokens, an
//! integer that overflows, or a range where `max <= min`.
//! Malformed input is an ordinary result, never an error path.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::instrument;

use crate::random::RandomSource;

lazy_static! {
    static ref RANGE_PATTERN: Regex = Regex::new(r"^([0-9]+)-([0-9]+)$").unwrap();
}

/// Outcome of evaluating one pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    /// The pattern was a numeric range; `value` lies in `[min, max)`.
    Range { min: u64, max: u64, value: u64 },
    /// The pattern was a choice list; `value` is one of its tokens.
    Choice { value: String },
    /// The pattern matched neither grammar.
    Invalid,
}

pub struct PatternEvaluator {
    random: Arc<RandomSource>,
}

impl PatternEvaluator {
    pub fn new(random: Arc<RandomSource>) -> Self {
        Self { random }
    }

    /// Classifies `pattern` and draws a result.
    ///
    /// Classification is deterministic for a given pattern; only the drawn
    /// value varies between calls.
    #[instrument(skip(self))]
    pub fn evaluate(&self, pattern: &str) -> EvaluationResult {
        if let Some(captures) = RANGE_PATTERN.captures(pattern) {
            return self.evaluate_range(&captures[1], &captures[2]);
        }
        self.evaluate_choice(pattern)
    }

    fn evaluate_range(&self, min: &str, max: &str) -> EvaluationResult {
        // A pattern that matched the range grammar never falls through to
        // the choice grammar; a degenerate or overflowing range is Invalid.
        match (min.parse::<u64>(), max.parse::<u64>()) {
            (Ok(min), Ok(max)) if min < max => {
                let value = self.random.uniform_int(min, max);
                EvaluationResult::Range { min, max, value }
            }
            _ => EvaluationResult::Invalid,
        }
    }

    fn evaluate_choice(&self, pattern: &str) -> EvaluationResult {
        let tokens: Vec<&str> = pattern
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.len() < 2 {
            return EvaluationResult::Invalid;
        }
        let index = self.random.uniform_int(0, tokens.len() as u64) as usize;
        EvaluationResult::Choice {
            value: tokens[index].to_string(),
        }
    }
}
