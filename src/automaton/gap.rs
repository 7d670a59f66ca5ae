//! Filters on the text between two consecutive phrase words.
//!
//! A scan normally lets any amount of text sit between phrase words. A
//! [`GapFilter`] can veto single jumps. [`ClauseBoundaries`] rejects jumps
//! that cross a line break or leave a clause through an unbalanced comma or
//! parenthesis:
//!
//! ```text
//! a b          allowed
//! a , b , c    allowed (the inserted clause is closed again)
//! a ( b ) c    allowed
//! a , b        rejected
//! a ( b        rejected
//! a ) b        rejected
//! ```
//!
//! # Examples
//!
//! ```
//! use scaphra::analysis::Analyzer;
//! use scaphra::automaton::{Automaton, ClauseBoundaries, ClauseRule, Phrase, ScanConfig};
//!
//! let automaton = Automaton::compile([Phrase::from_words("p", &["motor", "startet"])]).unwrap();
//! let analyzer = Analyzer::default();
//! let rule = ClauseRule::new().unwrap();
//!
//! let text = "Der Motor, sagt er, startet nicht";
//! let tokens = analyzer.analyze(text).unwrap();
//! let gaps = ClauseBoundaries::new(&rule, text, &tokens);
//! assert_eq!(automaton.scan_gated(&tokens, ScanConfig::default(), gaps).count(), 1);
//!
//! let text = "Der Motor ist kaputt, es startet nichts";
//! let tokens = analyzer.analyze(text).unwrap();
//! let gaps = ClauseBoundaries::new(&rule, text, &tokens);
//! assert_eq!(automaton.scan_gated(&tokens, ScanConfig::default(), gaps).count(), 0);
//! ```

use regex::Regex;

use crate::analysis::token::Token;
use crate::error::{Result, ScaphraError};

/// Decides whether a thread whose last word sits at position `from` may
/// consume the token at position `to`.
pub trait GapFilter {
    fn allows(&self, from: usize, to: usize) -> bool;

    /// True if [`allows`](Self::allows) never rejects anything.
    fn is_trivial(&self) -> bool {
        false
    }
}

impl<G: GapFilter + ?Sized> GapFilter for &G {
    fn allows(&self, from: usize, to: usize) -> bool {
        (**self).allows(from, to)
    }

    fn is_trivial(&self) -> bool {
        (**self).is_trivial()
    }
}

/// Allows every gap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnyGap;

impl GapFilter for AnyGap {
    fn allows(&self, _from: usize, _to: usize) -> bool {
        true
    }

    fn is_trivial(&self) -> bool {
        true
    }
}

/// Text between two words that stays in one clause: no comma or
/// parenthesis at all, or at least one complete `, ... ,` or `( ... )` pair.
const CLAUSE_PATTERN: &str = r"^[^(),]*$|,.*,|\(.*\)";

/// The compiled clause rule, built once and shared by every document.
#[derive(Clone, Debug)]
pub struct ClauseRule {
    regex: Regex,
}

impl ClauseRule {
    pub fn new() -> Result<Self> {
        let regex = Regex::new(CLAUSE_PATTERN)
            .map_err(|e| ScaphraError::analysis(format!("Invalid clause pattern: {e}")))?;
        Ok(ClauseRule { regex })
    }

    /// Check the text found between two phrase words.
    pub fn allows(&self, between: &str) -> bool {
        !between.contains('\n') && self.regex.is_match(between)
    }
}

/// Clause boundaries of one analyzed document.
///
/// Positions are token indices into `tokens`; the gap between two of them is
/// the source text from the end of the first to the start of the second.
#[derive(Clone, Copy, Debug)]
pub struct ClauseBoundaries<'a> {
    rule: &'a ClauseRule,
    text: &'a str,
    tokens: &'a [Token],
}

impl<'a> ClauseBoundaries<'a> {
    pub fn new(rule: &'a ClauseRule, text: &'a str, tokens: &'a [Token]) -> Self {
        ClauseBoundaries { rule, text, tokens }
    }

    /// The source text between the tokens at `from` and `to`.
    pub fn between(&self, from: usize, to: usize) -> Option<&'a str> {
        let start = self.tokens.get(from)?.end_offset;
        let end = self.tokens.get(to)?.start_offset;
        if end <= start {
            return Some("");
        }
        self.text.get(start..end)
    }
}

impl GapFilter for ClauseBoundaries<'_> {
    fn allows(&self, from: usize, to: usize) -> bool {
        self.between(from, to)
            .is_none_or(|between| self.rule.allows(between))
    }
}
