//! Matcher configuration.
//!
//! A configuration file is a JSON object; every field is optional.
//!
//! ```json
//! {
//!   "phrasemap": {"double": ["wird getroffen"]},
//!   "max_space": 2,
//!   "stemmer": "cistem",
//!   "tokenizer": "unicode",
//!   "token_pattern": null,
//!   "lemmas": "lemmas.json",
//!   "clause_boundaries": true
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::normalizer::{FormNormalizer, LemmaDictionary};
use crate::analysis::stemmer::StemmerKind;
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer, TokenizerKind};
use crate::automaton::ScanConfig;
use crate::error::{Result, ScaphraError};
use crate::phrasemap::PhraseMap;

/// Configuration for a [`Matcher`](crate::matcher::Matcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Phrases to match, keyed by label.
    pub phrasemap: PhraseMap,

    /// Maximum token distance between consecutive phrase words.
    /// If None, words may be arbitrarily far apart.
    pub max_space: Option<usize>,

    /// Stemmer producing the stem form.
    pub stemmer: StemmerKind,

    /// Tokenizer splitting documents and phrases.
    pub tokenizer: TokenizerKind,

    /// Regex matching a single token; replaces `tokenizer` when set.
    pub token_pattern: Option<String>,

    /// Optional JSON file mapping surface forms to lemmas.
    pub lemmas: Option<PathBuf>,

    /// Reject phrase words separated by a line break or an unbalanced
    /// comma or parenthesis.
    pub clause_boundaries: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            phrasemap: PhraseMap::new(),
            max_space: None,
            stemmer: StemmerKind::Cistem,
            tokenizer: TokenizerKind::UnicodeWord,
            token_pattern: None,
            lemmas: None,
            clause_boundaries: false,
        }
    }
}

impl MatcherConfig {
    /// Create a configuration for the given phrasemap.
    pub fn new(phrasemap: PhraseMap) -> Self {
        Self {
            phrasemap,
            ..Self::default()
        }
    }

    /// Set the maximum word distance.
    pub fn with_max_space(mut self, max_space: usize) -> Self {
        self.max_space = Some(max_space);
        self
    }

    /// Set the stemmer.
    pub fn with_stemmer(mut self, stemmer: StemmerKind) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Set the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Set the lemma dictionary file.
    pub fn with_lemmas<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.lemmas = Some(path.into());
        self
    }

    /// Keep phrase words within one clause.
    pub fn with_clause_boundaries(mut self, enabled: bool) -> Self {
        self.clause_boundaries = enabled;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MatcherConfig = serde_json::from_str(json)
            .map_err(|e| ScaphraError::parse(format!("Failed to parse matcher config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// A relative `lemmas` path is resolved against the directory of the
    /// configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaphraError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_json_str(&content)?;
        if let (Some(lemmas), Some(dir)) = (config.lemmas.as_mut(), path.parent()) {
            if lemmas.is_relative() {
                *lemmas = dir.join(&*lemmas);
            }
        }
        log::debug!("loaded matcher config from {}", path.display());
        Ok(config)
    }

    /// Check the configuration for values that can never match.
    pub fn validate(&self) -> Result<()> {
        self.scan_config().validate()
    }

    /// Scan options derived from this configuration.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_space: self.max_space,
        }
    }

    /// Build the analyzer this configuration describes, loading lemmas if set.
    pub fn build_analyzer(&self) -> Result<Analyzer> {
        let mut normalizer = FormNormalizer::with_stemmer(self.stemmer.build());
        if let Some(path) = &self.lemmas {
            normalizer = normalizer.with_lemmas(LemmaDictionary::load_from_file(path)?);
        }
        let tokenizer: Box<dyn Tokenizer> = match &self.token_pattern {
            Some(pattern) => Box::new(RegexTokenizer::with_pattern(pattern)?),
            None => self.tokenizer.build(),
        };
        Ok(Analyzer::new(tokenizer, Box::new(normalizer)))
    }
}
