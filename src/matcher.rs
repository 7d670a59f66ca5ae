//! High-level matcher: analyzer, compiled automaton and scan options in one place.
//!
//! # Examples
//!
//! ```
//! use scaphra::matcher::Matcher;
//! use scaphra::phrasemap::PhraseMap;
//!
//! let phrasemap = PhraseMap::from_json_str(r#"{"double": ["druckt nicht"]}"#).unwrap();
//! let matcher = Matcher::from_phrasemap(&phrasemap).unwrap();
//!
//! let matches = matcher.match_text("Montags druckt die Kiste nicht").unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].positions, vec![1, 4]);
//! ```

use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::automaton::{Automaton, ClauseBoundaries, ClauseRule, Match, ScanConfig};
use crate::collector::{MatchSink, SpanGroups};
use crate::config::MatcherConfig;
use crate::error::Result;
use crate::phrasemap::PhraseMap;

/// Matches raw text against a compiled phrase set.
///
/// The automaton sits behind an `Arc`, so cloning a matcher's automaton
/// handle for other threads never copies the trie.
#[derive(Debug)]
pub struct Matcher {
    analyzer: Analyzer,
    automaton: Arc<Automaton>,
    scan_config: ScanConfig,
    clauses: Option<ClauseRule>,
}

impl Matcher {
    /// Create a matcher from parts. The scan configuration is validated.
    pub fn new(
        analyzer: Analyzer,
        automaton: Arc<Automaton>,
        scan_config: ScanConfig,
    ) -> Result<Self> {
        scan_config.validate()?;
        Ok(Matcher {
            analyzer,
            automaton,
            scan_config,
            clauses: None,
        })
    }

    /// Keep phrase words within one clause of the source text.
    ///
    /// See [`ClauseBoundaries`] for the rule. Only text-based matching applies
    /// it; [`match_tokens`](Self::match_tokens) has no source text to check.
    pub fn with_clause_boundaries(mut self, enabled: bool) -> Result<Self> {
        self.clauses = if enabled {
            Some(ClauseRule::new()?)
        } else {
            None
        };
        Ok(self)
    }

    /// Compile `phrasemap` with the default analyzer and an unbounded scan.
    pub fn from_phrasemap(phrasemap: &PhraseMap) -> Result<Self> {
        let analyzer = Analyzer::default();
        let automaton = phrasemap.compile(&analyzer)?;
        Self::new(analyzer, Arc::new(automaton), ScanConfig::default())
    }

    /// Build the analyzer and compile the phrasemap described by `config`.
    pub fn from_config(config: &MatcherConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = config.build_analyzer()?;
        let automaton = config.phrasemap.compile(&analyzer)?;
        Self::new(analyzer, Arc::new(automaton), config.scan_config())?
            .with_clause_boundaries(config.clause_boundaries)
    }

    /// The analyzer applied to documents.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// The compiled automaton.
    pub fn automaton(&self) -> &Arc<Automaton> {
        &self.automaton
    }

    /// The scan options.
    pub fn scan_config(&self) -> ScanConfig {
        self.scan_config
    }

    /// Whether phrase words must stay within one clause.
    pub fn clause_boundaries(&self) -> bool {
        self.clauses.is_some()
    }

    /// Match already analyzed tokens.
    pub fn match_tokens(&self, tokens: &[Token]) -> Vec<Match> {
        self.automaton.scan_with(tokens, self.scan_config).collect()
    }

    /// Match `tokens` analyzed from `text`, applying clause boundaries if enabled.
    pub fn match_analyzed(&self, text: &str, tokens: &[Token]) -> Vec<Match> {
        match &self.clauses {
            Some(rule) => self
                .automaton
                .scan_gated(tokens, self.scan_config, ClauseBoundaries::new(rule, text, tokens))
                .collect(),
            None => self.match_tokens(tokens),
        }
    }

    /// Analyze `text` and return its matches in completion order.
    pub fn match_text(&self, text: &str) -> Result<Vec<Match>> {
        let tokens = self.analyzer.analyze(text)?;
        let matches = self.match_analyzed(text, &tokens);
        log::debug!("{} tokens, {} matches", tokens.len(), matches.len());
        Ok(matches)
    }

    /// Analyze `text` and feed its matches into `sink`.
    pub fn match_into<S: MatchSink + ?Sized>(&self, text: &str, sink: &mut S) -> Result<usize> {
        let matches = self.match_text(text)?;
        let count = matches.len();
        for matched in matches {
            sink.accept(matched);
        }
        Ok(count)
    }

    /// Analyze `text` and collect its matches as span groups.
    pub fn span_groups(&self, text: &str) -> Result<SpanGroups> {
        let mut groups = SpanGroups::new();
        self.match_into(text, &mut groups)?;
        Ok(groups)
    }

    /// Match many documents in parallel; results keep the input order.
    pub fn match_documents<S>(&self, documents: &[S]) -> Result<Vec<Vec<Match>>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|document| self.match_text(document.as_ref()))
            .collect()
    }
}
