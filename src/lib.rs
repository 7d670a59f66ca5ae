//! # scaphra
//!
//! A scattered phrase matcher: finds every registered phrase whose words
//! occur in order within a token sequence, with any number of unrelated
//! tokens in between.
//!
//! ## Features
//!
//! - Single pass over the text, one active partial match per automaton node
//! - Phrase words matched by normalized forms (lemma and CISTEM stem)
//! - Optional window limiting the distance between phrase words
//! - Phrasemaps and matcher configuration as JSON
//! - Compiled automata persisted with bincode
//! - Parallel matching of document batches with rayon
//!
//! ## Example
//!
//! ```
//! use scaphra::prelude::*;
//!
//! let phrasemap = PhraseMap::from_json_str(r#"{"problem": ["will nicht starten"]}"#).unwrap();
//! let matcher = Matcher::from_phrasemap(&phrasemap).unwrap();
//!
//! let matches = matcher.match_text("Der Motor will morgens nicht richtig starten").unwrap();
//! assert_eq!(matches[0].label, "problem");
//! assert_eq!(matches[0].positions, vec![2, 4, 6]);
//! ```

pub mod analysis;
pub mod automaton;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod matcher;
pub mod parallel;
pub mod phrasemap;

pub mod prelude {
    pub use crate::analysis::analyzer::Analyzer;
    pub use crate::analysis::token::{NormalizedForms, Token};
    pub use crate::automaton::{Automaton, Match, Phrase, PhraseWord, ScanConfig};
    pub use crate::collector::{MatchSink, SpanGroup, SpanGroups};
    pub use crate::config::MatcherConfig;
    pub use crate::error::{Result, ScaphraError};
    pub use crate::matcher::Matcher;
    pub use crate::phrasemap::PhraseMap;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
