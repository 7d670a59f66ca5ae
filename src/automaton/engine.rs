//! Single-pass match engine.
//!
//! A scan folds a token sequence into a [`ScanState`] holding at most one
//! [`ActiveThread`] per automaton node. Each token is tested once against
//! the edges its forms select in the form index; every selected edge whose
//! source node holds a thread (or whose source is the root) advances that
//! thread into the target node.
//!
//! Rules applied per token:
//!
//! - Threads that cannot advance are kept, so any number of unrelated tokens
//!   may sit between two phrase words.
//! - When several threads reach the same node, the one with the earliest
//!   start wins; a later start never displaces an open earlier one.
//! - Reaching a node with completion markers emits one [`Match`] per
//!   completing phrase. The thread stays at the node so longer phrases
//!   sharing the prefix can continue.
//! - Every thread counts the phrases below its node that its start has not
//!   completed yet. Once that count reaches zero the thread is closed: it
//!   still advances, but a thread with a later start may replace it. The same
//!   phrase can therefore fire again for a later occurrence, while phrases
//!   still open for the earlier start keep it.
//! - With [`ScanConfig::max_space`] set, threads whose last consumed token is
//!   too far behind expire, and collisions prefer the thread that consumed
//!   the most recent token.
//! - A [`GapFilter`] may veto a thread jumping from its last word to a token,
//!   e.g. across a clause boundary. Collisions then also prefer the most
//!   recent thread, since an older one may be blocked for good.
//!
//! Matches of one token are emitted in compile order of their phrases, so the
//! whole sequence is ordered by completion position and fully deterministic.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analysis::token::NormalizedForms;
use crate::automaton::gap::{AnyGap, GapFilter};
use crate::automaton::matched::Match;
use crate::automaton::{Automaton, EdgeId, NodeId, ROOT};
use crate::collector::MatchSink;
use crate::error::{Result, ScaphraError};

/// Options of a single scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum token distance between two consecutive phrase words.
    ///
    /// A thread whose last word was consumed at `j` may only advance at a
    /// position `i` with `i - j < max_space`. `None` means unbounded.
    /// `Some(0)` is rejected by [`validate`](Self::validate).
    #[serde(default)]
    pub max_space: Option<usize>,
}

impl ScanConfig {
    /// Create an unbounded scan configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the distance between consecutive phrase words.
    pub fn with_max_space(mut self, max_space: usize) -> Self {
        self.max_space = Some(max_space);
        self
    }

    /// Reject settings under which no multi-word phrase could ever match.
    pub fn validate(&self) -> Result<()> {
        if self.max_space == Some(0) {
            return Err(ScaphraError::config("max_space must be at least 1"));
        }
        Ok(())
    }
}

/// A partial match in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveThread {
    start: usize,
    positions: Vec<usize>,
    pending: usize,
}

impl ActiveThread {
    fn seed(position: usize, pending: usize) -> Self {
        ActiveThread {
            start: position,
            positions: vec![position],
            pending,
        }
    }

    fn advance(&self, position: usize, pending: usize) -> Self {
        let mut positions = Vec::with_capacity(self.positions.len() + 1);
        positions.extend_from_slice(&self.positions);
        positions.push(position);
        ActiveThread {
            start: self.start,
            positions,
            pending,
        }
    }

    /// Position of the first consumed token.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position of the most recently consumed token.
    pub fn last(&self) -> usize {
        self.positions.last().copied().unwrap_or(self.start)
    }

    /// Consumed token positions in order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Phrases below this thread's node not yet completed from its start.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether every phrase below this thread's node already completed from its start.
    pub fn is_closed(&self) -> bool {
        self.pending == 0
    }

    /// Whether `self`, arriving at a node, should take it over from `existing`.
    fn supersedes(&self, existing: &ActiveThread, prefer_recent: bool) -> bool {
        if self.start == existing.start {
            return false;
        }
        if existing.is_closed() {
            return true;
        }
        if prefer_recent {
            (self.last(), existing.start) > (existing.last(), self.start)
        } else {
            self.start < existing.start
        }
    }
}

/// Per-scan state: one slot per automaton node.
///
/// The number of live threads never exceeds the number of nodes, whatever
/// the length of the text.
#[derive(Clone, Debug)]
pub struct ScanState {
    threads: Vec<Option<ActiveThread>>,
    occupied: Vec<NodeId>,
    hits: Vec<EdgeId>,
    advances: Vec<(NodeId, ActiveThread)>,
    completed: Vec<(NodeId, usize, usize)>,
    emitted: Vec<Match>,
}

impl ScanState {
    /// Create an empty state sized for `automaton`.
    pub fn new(automaton: &Automaton) -> Self {
        ScanState {
            threads: vec![None; automaton.node_count()],
            occupied: Vec::new(),
            hits: Vec::new(),
            advances: Vec::new(),
            completed: Vec::new(),
            emitted: Vec::new(),
        }
    }

    /// Number of nodes currently holding a thread.
    pub fn active_count(&self) -> usize {
        self.occupied.len()
    }

    /// The thread at `node`, if any.
    pub fn thread_at(&self, node: NodeId) -> Option<&ActiveThread> {
        self.threads.get(node).and_then(Option::as_ref)
    }

    /// Iterate over `(node, thread)` pairs in node order.
    pub fn threads(&self) -> impl Iterator<Item = (NodeId, &ActiveThread)> {
        self.threads
            .iter()
            .enumerate()
            .filter_map(|(node, thread)| thread.as_ref().map(|t| (node, t)))
    }

    /// Drop all threads so the state can be reused for another document.
    pub fn reset(&mut self) {
        for &node in &self.occupied {
            self.threads[node] = None;
        }
        self.occupied.clear();
    }

    /// Consume the token at `position` and push completed matches into `out`.
    ///
    /// Positions must increase from one call to the next.
    pub fn step<T, E>(
        &mut self,
        automaton: &Automaton,
        config: &ScanConfig,
        position: usize,
        token: &T,
        out: &mut E,
    ) where
        T: NormalizedForms + ?Sized,
        E: Extend<Match>,
    {
        self.step_gated(automaton, config, &AnyGap, position, token, out);
    }

    /// Like [`step`](Self::step), but a thread only advances if `gaps` allows
    /// the jump from its last consumed position to `position`.
    pub fn step_gated<G, T, E>(
        &mut self,
        automaton: &Automaton,
        config: &ScanConfig,
        gaps: &G,
        position: usize,
        token: &T,
        out: &mut E,
    ) where
        G: GapFilter + ?Sized,
        T: NormalizedForms + ?Sized,
        E: Extend<Match>,
    {
        if let Some(max_space) = config.max_space {
            self.expire(position, max_space);
        }

        let hits = &mut self.hits;
        hits.clear();
        token.for_each_form(&mut |form| hits.extend_from_slice(automaton.edges_accepting(form)));
        if hits.is_empty() {
            return;
        }
        hits.sort_unstable();
        hits.dedup();

        // All advances read the state as it was before this token.
        self.advances.clear();
        for &id in self.hits.iter() {
            let edge = automaton.edge(id);
            let pending = automaton.node(edge.target()).phrases_below();
            let candidate = if edge.source() == ROOT {
                Some(ActiveThread::seed(position, pending))
            } else {
                self.threads[edge.source()]
                    .as_ref()
                    .filter(|thread| gaps.allows(thread.last(), position))
                    .map(|thread| thread.advance(position, pending))
            };
            if let Some(candidate) = candidate {
                self.advances.push((edge.target(), candidate));
            }
        }

        self.advances
            .sort_by(|a, b| a.0.cmp(&b.0).then(a.1.start.cmp(&b.1.start)));
        self.advances.dedup_by_key(|(node, _)| *node);

        let prefer_recent = config.max_space.is_some() || !gaps.is_trivial();
        self.completed.clear();
        for (node, candidate) in self.advances.drain(..) {
            let slot = &mut self.threads[node];
            match slot {
                Some(existing) if !candidate.supersedes(existing, prefer_recent) => continue,
                Some(_) => {}
                None => self.occupied.push(node),
            }

            let completions = automaton.node(node).completions();
            if !completions.is_empty() {
                for &phrase in completions {
                    let label = automaton.phrase(phrase).label();
                    self.emitted
                        .push(Match::new(phrase, label, candidate.positions.clone()));
                }
                self.completed.push((node, candidate.start, completions.len()));
            }
            *slot = Some(candidate);
        }

        for &(node, start, count) in &self.completed {
            settle_path(automaton, &mut self.threads, node, start, count);
        }

        self.emitted.sort_by_key(|m| m.phrase);
        out.extend(self.emitted.drain(..));
    }

    fn expire(&mut self, position: usize, max_space: usize) {
        let threads = &mut self.threads;
        self.occupied.retain(|&node| {
            let alive = threads[node]
                .as_ref()
                .is_some_and(|thread| position.saturating_sub(thread.last()) < max_space);
            if !alive {
                threads[node] = None;
            }
            alive
        });
    }
}

/// Count `completed` phrases off every thread with `start` on the path from
/// `node` up to the root.
fn settle_path(
    automaton: &Automaton,
    threads: &mut [Option<ActiveThread>],
    node: NodeId,
    start: usize,
    completed: usize,
) {
    let mut current = Some(node);
    while let Some(id) = current.filter(|&id| id != ROOT) {
        if let Some(thread) = threads[id].as_mut().filter(|t| t.start == start) {
            thread.pending = thread.pending.saturating_sub(completed);
        }
        current = automaton.node(id).parent();
    }
}

/// Lazy iterator of matches over a token sequence.
///
/// Tokens are pulled only as far as needed to produce the next match;
/// dropping the iterator abandons the scan.
pub struct Scan<'a, I, G = AnyGap> {
    automaton: &'a Automaton,
    config: ScanConfig,
    gaps: G,
    tokens: I,
    state: ScanState,
    position: usize,
    pending: VecDeque<Match>,
    finished: bool,
}

impl<'a, I, G> Scan<'a, I, G> {
    fn new(automaton: &'a Automaton, config: ScanConfig, gaps: G, tokens: I) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid scan config: {config:?}");
        Scan {
            automaton,
            config,
            gaps,
            tokens,
            state: ScanState::new(automaton),
            position: 0,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// The state after the tokens consumed so far.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<I, G> Iterator for Scan<'_, I, G>
where
    I: Iterator,
    I::Item: NormalizedForms,
    G: GapFilter,
{
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(matched) = self.pending.pop_front() {
                return Some(matched);
            }
            if self.finished {
                return None;
            }

            match self.tokens.next() {
                Some(token) => {
                    self.state.step_gated(
                        self.automaton,
                        &self.config,
                        &self.gaps,
                        self.position,
                        &token,
                        &mut self.pending,
                    );
                    self.position += 1;
                }
                None => {
                    self.finished = true;
                    if self.position == 0 {
                        log::debug!("empty token sequence, no matches");
                    } else {
                        log::debug!(
                            "scanned {} tokens, {} threads left unfinished",
                            self.position,
                            self.state.active_count()
                        );
                    }
                }
            }
        }
    }
}

impl Automaton {
    /// Scan `tokens` with the default configuration.
    pub fn scan<I>(&self, tokens: I) -> Scan<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: NormalizedForms,
    {
        Scan::new(self, ScanConfig::default(), AnyGap, tokens.into_iter())
    }

    /// Scan `tokens` with an explicit configuration.
    ///
    /// The configuration is expected to pass [`ScanConfig::validate`];
    /// [`Matcher`](crate::matcher::Matcher) checks it up front.
    pub fn scan_with<I>(&self, tokens: I, config: ScanConfig) -> Scan<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: NormalizedForms,
    {
        Scan::new(self, config, AnyGap, tokens.into_iter())
    }

    /// Scan `tokens`, letting `gaps` veto jumps between consecutive phrase words.
    pub fn scan_gated<I, G>(&self, tokens: I, config: ScanConfig, gaps: G) -> Scan<'_, I::IntoIter, G>
    where
        I: IntoIterator,
        I::Item: NormalizedForms,
        G: GapFilter,
    {
        Scan::new(self, config, gaps, tokens.into_iter())
    }

    /// Collect every match of `tokens` with the default configuration.
    pub fn find_all<I>(&self, tokens: I) -> Vec<Match>
    where
        I: IntoIterator,
        I::Item: NormalizedForms,
    {
        self.scan(tokens).collect()
    }

    /// Feed every match of `tokens` into `sink` and return how many were produced.
    pub fn scan_into<I, S>(&self, tokens: I, config: ScanConfig, sink: &mut S) -> usize
    where
        I: IntoIterator,
        I::Item: NormalizedForms,
        S: MatchSink + ?Sized,
    {
        let mut count = 0;
        for matched in self.scan_with(tokens, config) {
            sink.accept(matched);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::pattern::{Phrase, PhraseWord};

    fn compile(phrases: &[(&str, &[&str])]) -> Automaton {
        Automaton::compile(
            phrases
                .iter()
                .map(|(label, words)| Phrase::from_words(*label, words)),
        )
        .unwrap()
    }

    fn positions(matches: &[Match]) -> Vec<(&str, Vec<usize>)> {
        matches
            .iter()
            .map(|m| (m.label.as_str(), m.positions.clone()))
            .collect()
    }

    #[test]
    fn test_single_word_phrase() {
        let automaton = Automaton::compile([Phrase::new(
            "hobbit",
            vec![PhraseWord::new(["hobbit", "hobbits"])],
        )])
        .unwrap();

        let tokens: Vec<Vec<&str>> = vec![vec!["live"], vec!["hobbits"], vec!["in"]];
        let matches = automaton.find_all(&tokens);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].positions, vec![1]);
        assert_eq!(matches[0].span(), (1, 1));
    }

    #[test]
    fn test_scattered_match_keeps_progress() {
        let automaton = compile(&[("problem", &["not", "start"])]);
        let tokens = ["does", "it", "not", "always", "start", "well"];

        let matches = automaton.find_all(tokens);
        assert_eq!(positions(&matches), vec![("problem", vec![2, 4])]);
    }

    #[test]
    fn test_order_is_respected() {
        let automaton = compile(&[("live", &["live", "hobbits"])]);
        assert!(automaton.find_all(["hobbits", "live"]).is_empty());
    }

    #[test]
    fn test_earliest_start_wins() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let matches = automaton.find_all(["a", "x", "a", "b"]);

        assert_eq!(positions(&matches), vec![("p", vec![0, 3])]);
    }

    #[test]
    fn test_later_start_never_displaces_open_thread() {
        let automaton = compile(&[("p", &["a", "b", "c"])]);
        let mut scan = automaton.scan(["a", "b", "a", "b"]);
        assert!(scan.next().is_none());

        let thread = scan.state().thread_at(2).unwrap();
        assert_eq!(thread.start(), 0);
        assert_eq!(thread.positions(), &[0, 1]);
    }

    #[test]
    fn test_phrase_fires_again_for_later_occurrence() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let matches = automaton.find_all(["a", "b", "x", "a", "b"]);

        assert_eq!(positions(&matches), vec![("p", vec![0, 1]), ("p", vec![3, 4])]);
    }

    #[test]
    fn test_start_is_never_reused_by_same_phrase() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let matches = automaton.find_all(["a", "b", "b", "b"]);

        assert_eq!(positions(&matches), vec![("p", vec![0, 1])]);
    }

    #[test]
    fn test_sibling_phrase_keeps_earliest_start() {
        let automaton = compile(&[("ab", &["a", "b"]), ("ac", &["a", "c"])]);
        let matches = automaton.find_all(["a", "b", "a", "c"]);

        assert_eq!(positions(&matches), vec![("ab", vec![0, 1]), ("ac", vec![0, 3])]);
    }

    #[test]
    fn test_longer_phrase_keeps_earliest_start() {
        let automaton = compile(&[("short", &["a", "b"]), ("long", &["a", "b", "c"])]);
        let matches = automaton.find_all(["a", "b", "a", "b", "c"]);

        assert_eq!(
            positions(&matches),
            vec![("short", vec![0, 1]), ("long", vec![0, 1, 4])]
        );
    }

    #[test]
    fn test_thread_closes_once_every_phrase_below_completed() {
        let automaton = compile(&[("ab", &["a", "b"]), ("ac", &["a", "c"])]);
        let mut scan = automaton.scan(["a", "b", "c", "a", "b"]);
        let matches: Vec<Match> = scan.by_ref().collect();

        assert_eq!(
            positions(&matches),
            vec![("ab", vec![0, 1]), ("ac", vec![0, 2]), ("ab", vec![3, 4])]
        );
        let thread = scan.state().thread_at(1).unwrap();
        assert_eq!(thread.start(), 3);
        assert_eq!(thread.pending(), 1);
        assert!(!thread.is_closed());
    }

    #[test]
    fn test_gap_filter_vetoes_jumps() {
        struct Adjacent;
        impl GapFilter for Adjacent {
            fn allows(&self, from: usize, to: usize) -> bool {
                to == from + 1
            }
        }

        let automaton = compile(&[("p", &["a", "b"])]);
        let gated: Vec<Match> = automaton
            .scan_gated(["a", "x", "b", "a", "b"], ScanConfig::default(), Adjacent)
            .collect();

        assert_eq!(positions(&gated), vec![("p", vec![3, 4])]);
    }

    #[test]
    fn test_step_tolerates_repeated_position() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let config = ScanConfig::new().with_max_space(2);
        let mut state = ScanState::new(&automaton);
        let mut out: Vec<Match> = Vec::new();

        state.step(&automaton, &config, 5, "a", &mut out);
        state.step(&automaton, &config, 4, "x", &mut out);
        assert_eq!(state.active_count(), 1);
        assert!(out.is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid scan config")]
    fn test_scan_with_zero_max_space_panics_in_debug() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let config = ScanConfig { max_space: Some(0) };
        let _ = automaton.scan_with(["a", "b"], config).count();
    }

    #[test]
    fn test_prefix_and_longer_phrase_both_fire() {
        let automaton = compile(&[
            ("long", &["will", "nicht", "starten"]),
            ("short", &["will", "nicht"]),
        ]);
        let tokens = ["der", "motor", "will", "einfach", "nicht", "richtig", "starten"];

        let matches = automaton.find_all(tokens);
        assert_eq!(
            positions(&matches),
            vec![("short", vec![2, 4]), ("long", vec![2, 4, 6])]
        );
    }

    #[test]
    fn test_ties_follow_compile_order() {
        let automaton = compile(&[("second", &["x", "b"]), ("first", &["a", "b"]), ("dup", &["a", "b"])]);
        let matches = automaton.find_all(["a", "x", "b"]);

        let labels: Vec<&str> = matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["second", "first", "dup"]);
        assert!(matches.iter().all(|m| m.end() == 2));
    }

    #[test]
    fn test_ambiguous_forms_fan_out() {
        let automaton = Automaton::compile([
            Phrase::new(
                "lemma",
                vec![PhraseWord::single("drucken"), PhraseWord::single("nicht")],
            ),
            Phrase::new(
                "stem",
                vec![PhraseWord::single("druck"), PhraseWord::single("nicht")],
            ),
        ])
        .unwrap();

        let tokens = vec![vec!["drucken", "druck"], vec!["nicht", "nich"]];
        let matches = automaton.find_all(&tokens);

        assert_eq!(
            positions(&matches),
            vec![("lemma", vec![0, 1]), ("stem", vec![0, 1])]
        );
    }

    #[test]
    fn test_token_is_consumed_once_per_thread() {
        let automaton = compile(&[("p", &["a", "a"])]);

        assert!(automaton.find_all(["a"]).is_empty());
        assert_eq!(positions(&automaton.find_all(["a", "a"])), vec![("p", vec![0, 1])]);
    }

    #[test]
    fn test_active_threads_bounded_by_nodes() {
        let automaton = compile(&[("hole", &["in", "holes"]), ("garden", &["in", "gardens"])]);
        let tokens: Vec<&str> = std::iter::repeat_n("in", 50)
            .chain(["holes", "gardens"])
            .collect();

        let mut scan = automaton.scan(&tokens);
        let matches: Vec<Match> = scan.by_ref().collect();

        assert_eq!(positions(&matches), vec![("hole", vec![0, 50]), ("garden", vec![0, 51])]);
        assert!(scan.state().active_count() < automaton.node_count());
    }

    #[test]
    fn test_max_space_window() {
        let automaton = compile(&[("double", &["wird", "getroffen"])]);
        let config = ScanConfig::new().with_max_space(2);

        let hit: Vec<Match> = automaton
            .scan_with(["das", "wird", "getroffen"], config)
            .collect();
        assert_eq!(positions(&hit), vec![("double", vec![1, 2])]);

        let miss: Vec<Match> = automaton
            .scan_with(["das", "wird", "nicht", "getroffen"], config)
            .collect();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_max_space_prefers_recent_thread() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let config = ScanConfig::new().with_max_space(3);

        let matches: Vec<Match> = automaton
            .scan_with(["a", "x", "a", "x", "b"], config)
            .collect();
        assert_eq!(positions(&matches), vec![("p", vec![2, 4])]);
    }

    #[test]
    fn test_max_space_expires_threads() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let config = ScanConfig::new().with_max_space(2);

        let mut scan = automaton.scan_with(["a", "x", "x"], config);
        assert!(scan.next().is_none());
        assert_eq!(scan.state().active_count(), 0);
    }

    #[test]
    fn test_zero_max_space_is_rejected() {
        assert!(ScanConfig::new().with_max_space(0).validate().is_err());
        assert!(ScanConfig::new().with_max_space(1).validate().is_ok());
    }

    #[test]
    fn test_empty_input() {
        let automaton = compile(&[("p", &["a"])]);
        let tokens: Vec<&str> = Vec::new();
        assert!(automaton.find_all(tokens).is_empty());
    }

    #[test]
    fn test_state_reset() {
        let automaton = compile(&[("p", &["a", "b"])]);
        let mut state = ScanState::new(&automaton);
        let mut out: Vec<Match> = Vec::new();

        state.step(&automaton, &ScanConfig::default(), 0, "a", &mut out);
        assert_eq!(state.active_count(), 1);

        state.reset();
        assert_eq!(state.active_count(), 0);
        assert!(state.threads().next().is_none());
    }
}
