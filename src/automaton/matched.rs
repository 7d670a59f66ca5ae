//! Completed phrase matches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::automaton::PhraseId;

/// A completed phrase occurrence.
///
/// `positions` holds one strictly increasing token index per phrase word,
/// in the order the words were consumed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// Compile-order id of the matched phrase
    pub phrase: PhraseId,
    /// Label of the matched phrase
    pub label: String,
    /// Consumed token positions
    pub positions: Vec<usize>,
}

impl Match {
    /// Create a new match.
    pub fn new<S: Into<String>>(phrase: PhraseId, label: S, positions: Vec<usize>) -> Self {
        Match {
            phrase,
            label: label.into(),
            positions,
        }
    }

    /// Position of the first consumed token.
    pub fn start(&self) -> usize {
        self.positions.first().copied().unwrap_or_default()
    }

    /// Position of the last consumed token.
    pub fn end(&self) -> usize {
        self.positions.last().copied().unwrap_or_default()
    }

    /// Inclusive `(min, max)` token span.
    pub fn span(&self) -> (usize, usize) {
        (self.start(), self.end())
    }

    /// Number of consumed tokens.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the match consumed no tokens.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Contiguous runs of positions as half-open `(start, end)` ranges.
    pub fn spans(&self) -> Vec<(usize, usize)> {
        spanify(&self.positions)
    }

    /// Identifier unique per label and positions: `match:LABEL:I.J.K`.
    pub fn name(&self) -> String {
        let positions: Vec<String> = self.positions.iter().map(usize::to_string).collect();
        format!("match:{}:{}", self.label, positions.join("."))
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.span();
        write!(f, "{} [{}-{}] {:?}", self.label, start, end, self.positions)
    }
}

/// Collapse sorted positions into half-open ranges of consecutive indices.
///
/// ```
/// use scaphra::automaton::matched::spanify;
///
/// assert_eq!(spanify(&[1, 2, 3, 4, 6, 8, 9]), vec![(1, 5), (6, 7), (8, 10)]);
/// assert_eq!(spanify(&[1, 3, 5]), vec![(1, 2), (3, 4), (5, 6)]);
/// ```
pub fn spanify(positions: &[usize]) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for &position in positions {
        match spans.last_mut() {
            Some((_, end)) if *end == position => *end += 1,
            _ => spans.push((position, position + 1)),
        }
    }
    spans
}
