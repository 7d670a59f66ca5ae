//! The shared phrase automaton.
//!
//! Phrases are compiled into a prefix trie over word slots, stored as an
//! arena of [`Node`]s addressed by index. Phrases with identical leading
//! slots share the same trie levels, so the progress of all of them is
//! tracked by a single node during a scan.
//!
//! ```text
//! phrases: "in holes", "in gardens", "live"
//!
//!   (0) ──in──▶ (1) ──holes───▶ (2) ✓ "in holes"
//!    │           └──gardens──▶ (3) ✓ "in gardens"
//!    └──live──▶ (4) ✓ "live"
//! ```
//!
//! Besides the trie, the automaton keeps an inverted form index
//! (normalized form → edges whose slot accepts it). A token only ever visits
//! the edges one of its forms selects, which keeps per-token work
//! independent of the total number of registered phrases.
//!
//! # Examples
//!
//! ```
//! use scaphra::automaton::Automaton;
//! use scaphra::automaton::pattern::Phrase;
//!
//! let automaton = Automaton::compile([
//!     Phrase::from_words("hole", &["in", "holes"]),
//!     Phrase::from_words("garden", &["in", "gardens"]),
//! ])
//! .unwrap();
//!
//! // root, "in", "in holes", "in gardens"
//! assert_eq!(automaton.node_count(), 4);
//!
//! let tokens = ["in", "the", "holes", "and", "gardens"];
//! let matches: Vec<_> = automaton.scan(tokens).collect();
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches[0].positions, vec![0, 2]);
//! assert_eq!(matches[1].positions, vec![0, 4]);
//! ```

pub mod engine;
pub mod gap;
pub mod matched;
pub mod pattern;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaphraError};

pub use engine::{ActiveThread, Scan, ScanConfig, ScanState};
pub use gap::{AnyGap, ClauseBoundaries, ClauseRule, GapFilter};
pub use matched::Match;
pub use pattern::{Phrase, PhraseWord};

/// Index of a node in the automaton arena.
pub type NodeId = usize;

/// Index of an edge in the automaton arena.
pub type EdgeId = usize;

/// Index of a phrase in compile order.
pub type PhraseId = usize;

/// The root node: progress "nothing matched yet".
pub const ROOT: NodeId = 0;

/// A trie node: the progress of having matched a prefix of some phrases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    parent: Option<NodeId>,
    depth: usize,
    edges: Vec<EdgeId>,
    completions: Vec<PhraseId>,
    phrases_below: usize,
}

impl Node {
    fn new(parent: Option<NodeId>, depth: usize) -> Self {
        Node {
            parent,
            depth,
            edges: Vec::new(),
            completions: Vec::new(),
            phrases_below: 0,
        }
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of word slots matched on the way to this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Outgoing edges in insertion order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Phrases completing at this node, in compile order.
    pub fn completions(&self) -> &[PhraseId] {
        &self.completions
    }

    /// Number of phrases completing at this node or anywhere below it.
    pub fn phrases_below(&self) -> usize {
        self.phrases_below
    }

    /// Check whether at least one phrase completes here.
    pub fn is_terminal(&self) -> bool {
        !self.completions.is_empty()
    }
}

/// A transition taken when a token satisfies `word`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    word: PhraseWord,
}

impl Edge {
    /// The node this edge leaves.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The node this edge enters.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The word slot guarding this edge.
    pub fn word(&self) -> &PhraseWord {
        &self.word
    }
}

/// Per-phrase metadata kept after compilation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledPhrase {
    label: String,
    len: usize,
    terminal: NodeId,
}

impl CompiledPhrase {
    /// The phrase label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of word slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: empty phrases are rejected at compile time.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The node at which this phrase completes.
    pub fn terminal(&self) -> NodeId {
        self.terminal
    }
}

/// The compiled, immutable phrase automaton.
///
/// An `Automaton` is `Send + Sync` and never mutated after [`build`](AutomatonBuilder::build),
/// so it can be shared through an `Arc` by any number of concurrent scans.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Automaton {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    phrases: Vec<CompiledPhrase>,
    labels: BTreeMap<String, Vec<PhraseId>>,
    form_index: HashMap<String, Vec<EdgeId>, RandomState>,
}

impl Automaton {
    /// Compile phrases into an automaton, in the order given.
    pub fn compile<I>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = Phrase>,
    {
        let mut builder = AutomatonBuilder::new();
        for phrase in phrases {
            builder.add_phrase(phrase)?;
        }
        Ok(builder.build())
    }

    /// Start building an automaton incrementally.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::new()
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// All nodes; index 0 is the root.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get an edge by id.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// All edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a compiled phrase by id.
    pub fn phrase(&self, id: PhraseId) -> &CompiledPhrase {
        &self.phrases[id]
    }

    /// All compiled phrases in compile order.
    pub fn phrases(&self) -> &[CompiledPhrase] {
        &self.phrases
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of compiled phrases.
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Depth of the deepest node, i.e. the length of the longest phrase.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Distinct labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Terminal nodes of every phrase registered under `label`.
    pub fn terminals(&self, label: &str) -> Vec<NodeId> {
        self.labels
            .get(label)
            .map(|ids| ids.iter().map(|&id| self.phrases[id].terminal).collect())
            .unwrap_or_default()
    }

    /// Edges whose word slot accepts `form`, in ascending id order.
    pub fn edges_accepting(&self, form: &str) -> &[EdgeId] {
        self.form_index
            .get(form)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Serialize the automaton with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize an automaton written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let automaton: Automaton = bincode::deserialize(bytes)?;
        automaton.check()?;
        Ok(automaton)
    }

    /// Write the automaton to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        bincode::serialize_into(writer, self)?;
        log::info!(
            "saved automaton with {} phrases to {}",
            self.phrase_count(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read an automaton written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let automaton: Automaton = bincode::deserialize_from(reader)?;
        automaton.check()?;
        log::info!(
            "loaded automaton with {} phrases from {}",
            automaton.phrase_count(),
            path.as_ref().display()
        );
        Ok(automaton)
    }

    /// Structural sanity check for deserialized data.
    ///
    /// Every arena index must be in range and the nodes must form a trie
    /// whose parents precede their children, so scanning never panics.
    fn check(&self) -> Result<()> {
        let nodes = self.nodes.len();
        let edges = self.edges.len();
        let phrases = self.phrases.len();
        if nodes == 0 || self.nodes[ROOT].parent.is_some() {
            return Err(ScaphraError::serialization("automaton has no root node"));
        }

        let bad_parent = self
            .nodes
            .iter()
            .enumerate()
            .skip(1)
            .any(|(id, node)| node.parent.is_none_or(|parent| parent >= id));
        let bad_edge = self.edges.iter().any(|edge| {
            edge.source >= nodes
                || edge.target >= nodes
                || self.nodes[edge.target].parent != Some(edge.source)
        });
        let bad_node_edge = self.nodes.iter().enumerate().any(|(id, node)| {
            node.edges
                .iter()
                .any(|&edge| edge >= edges || self.edges[edge].source != id)
        });
        let bad_form_index = self.form_index.values().flatten().any(|&edge| edge >= edges);
        let bad_phrase = self.phrases.iter().any(|p| p.terminal >= nodes);
        let bad_completion = self
            .nodes
            .iter()
            .flat_map(|node| node.completions.iter())
            .any(|&id| id >= phrases);
        let bad_label = self.labels.values().flatten().any(|&id| id >= phrases);

        if bad_parent
            || bad_edge
            || bad_node_edge
            || bad_form_index
            || bad_phrase
            || bad_completion
            || bad_label
        {
            return Err(ScaphraError::serialization(
                "automaton references missing nodes, edges or phrases",
            ));
        }

        let counted = phrases_below(&self.nodes);
        if self
            .nodes
            .iter()
            .zip(&counted)
            .any(|(node, &count)| node.phrases_below != count)
        {
            return Err(ScaphraError::serialization(
                "automaton phrase counts do not match its nodes",
            ));
        }
        Ok(())
    }
}

/// Incremental compiler for an [`Automaton`].
#[derive(Debug)]
pub struct AutomatonBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    phrases: Vec<CompiledPhrase>,
    children: HashMap<(NodeId, PhraseWord), NodeId, RandomState>,
}

impl AutomatonBuilder {
    /// Create a builder holding only the root node.
    pub fn new() -> Self {
        AutomatonBuilder {
            nodes: vec![Node::new(None, 0)],
            edges: Vec::new(),
            phrases: Vec::new(),
            children: HashMap::default(),
        }
    }

    /// Insert a phrase, sharing every prefix already present.
    ///
    /// Fails with [`ScaphraError::InvalidPattern`] for a phrase without words
    /// or with a word that accepts no forms.
    pub fn add_phrase(&mut self, phrase: Phrase) -> Result<PhraseId> {
        phrase.validate()?;

        let (label, words) = phrase.into_parts();
        let len = words.len();
        let mut current = ROOT;

        for word in words {
            let key = (current, word);
            current = match self.children.get(&key) {
                Some(&child) => child,
                None => {
                    let (source, word) = key;
                    let child = self.nodes.len();
                    let depth = self.nodes[source].depth + 1;
                    self.nodes.push(Node::new(Some(source), depth));

                    let edge = self.edges.len();
                    self.edges.push(Edge {
                        source,
                        target: child,
                        word: word.clone(),
                    });
                    self.nodes[source].edges.push(edge);
                    self.children.insert((source, word), child);
                    child
                }
            };
        }

        let id = self.phrases.len();
        self.nodes[current].completions.push(id);
        self.phrases.push(CompiledPhrase {
            label,
            len,
            terminal: current,
        });
        Ok(id)
    }

    /// Number of phrases added so far.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Check if no phrase has been added.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Freeze the trie and build the form index.
    pub fn build(mut self) -> Automaton {
        let counts = phrases_below(&self.nodes);
        for (node, count) in self.nodes.iter_mut().zip(counts) {
            node.phrases_below = count;
        }

        let mut form_index: HashMap<String, Vec<EdgeId>, RandomState> = HashMap::default();
        for (id, edge) in self.edges.iter().enumerate() {
            for form in edge.word.forms() {
                form_index.entry(form.to_string()).or_default().push(id);
            }
        }

        let mut labels: BTreeMap<String, Vec<PhraseId>> = BTreeMap::new();
        for (id, phrase) in self.phrases.iter().enumerate() {
            labels.entry(phrase.label.clone()).or_default().push(id);
        }

        log::info!(
            "compiled {} phrases into {} nodes ({} edges, {} distinct forms)",
            self.phrases.len(),
            self.nodes.len(),
            self.edges.len(),
            form_index.len()
        );

        Automaton {
            nodes: self.nodes,
            edges: self.edges,
            phrases: self.phrases,
            labels,
            form_index,
        }
    }
}

/// Phrases completing at or below each node. Parents must precede children.
fn phrases_below(nodes: &[Node]) -> Vec<usize> {
    let mut counts: Vec<usize> = nodes.iter().map(|node| node.completions.len()).collect();
    for id in (1..nodes.len()).rev() {
        if let Some(parent) = nodes[id].parent {
            counts[parent] += counts[id];
        }
    }
    counts
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
