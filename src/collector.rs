//! Result collection.
//!
//! Matches leave the engine through [`MatchSink`]. [`SpanGroups`] is the
//! annotation-friendly shape: one named group of token spans per match,
//! keyed `match:LABEL:POSITIONS` so that identical matches collapse.
//!
//! # Examples
//!
//! ```
//! use scaphra::automaton::{Automaton, Phrase, ScanConfig};
//! use scaphra::collector::SpanGroups;
//!
//! let automaton = Automaton::compile([Phrase::from_words("double", &["druckt", "nicht"])]).unwrap();
//! let tokens = ["montags", "druckt", "die", "kiste", "nicht"];
//!
//! let mut groups = SpanGroups::new();
//! automaton.scan_into(tokens, ScanConfig::default(), &mut groups);
//!
//! let group = groups.get("match:double:1.4").unwrap();
//! assert_eq!(group.spans, vec![(1, 2), (4, 5)]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::automaton::matched::Match;

/// Receiver of completed matches.
pub trait MatchSink {
    /// Take ownership of one match.
    fn accept(&mut self, matched: Match);
}

impl MatchSink for Vec<Match> {
    fn accept(&mut self, matched: Match) {
        self.push(matched);
    }
}

/// One match rendered as labeled token spans.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanGroup {
    /// `match:LABEL:POSITIONS`
    pub name: String,
    /// Label of the matched phrase
    pub label: String,
    /// Half-open token ranges covered by the match
    pub spans: Vec<(usize, usize)>,
}

impl From<&Match> for SpanGroup {
    fn from(matched: &Match) -> Self {
        SpanGroup {
            name: matched.name(),
            label: matched.label.clone(),
            spans: matched.spans(),
        }
    }
}

/// Span groups keyed by name, in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanGroups {
    groups: BTreeMap<String, SpanGroup>,
}

impl SpanGroups {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a match; a match with the same label and positions replaces the earlier one.
    pub fn insert(&mut self, matched: &Match) {
        let group = SpanGroup::from(matched);
        self.groups.insert(group.name.clone(), group);
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&SpanGroup> {
        self.groups.get(name)
    }

    /// Iterate over groups in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SpanGroup> {
        self.groups.values()
    }

    /// Groups of a single label.
    pub fn by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a SpanGroup> + 'a {
        self.groups.values().filter(move |group| group.label == label)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no group was collected.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the collection into a vector in name order.
    pub fn into_vec(self) -> Vec<SpanGroup> {
        self.groups.into_values().collect()
    }
}

impl MatchSink for SpanGroups {
    fn accept(&mut self, matched: Match) {
        self.insert(&matched);
    }
}

impl FromIterator<Match> for SpanGroups {
    fn from_iter<I: IntoIterator<Item = Match>>(iter: I) -> Self {
        let mut groups = SpanGroups::new();
        for matched in iter {
            groups.insert(&matched);
        }
        groups
    }
}
