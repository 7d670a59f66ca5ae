//! Phrasemaps: the user-facing phrase registry.
//!
//! A phrasemap maps a label to the surface phrases that should be reported
//! under it, in the same JSON shape the matcher configuration uses:
//!
//! ```json
//! {
//!   "single": ["drucken"],
//!   "double": ["druckt nicht", "wird getroffen"],
//!   "triple": ["will nicht starten"]
//! }
//! ```
//!
//! Phrases are analyzed with the same [`Analyzer`] as the documents, so every
//! phrase word becomes a [`PhraseWord`] accepting the word's normalized
//! forms (lemma and stem).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::automaton::pattern::{Phrase, PhraseWord};
use crate::automaton::{Automaton, AutomatonBuilder};
use crate::error::{Result, ScaphraError};

/// Label → surface phrases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl PhraseMap {
    /// Create an empty phrasemap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a phrasemap from a JSON object string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ScaphraError::parse(format!("Failed to parse phrasemap: {e}")))
    }

    /// Load a phrasemap from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaphraError::config(format!(
                "Failed to read phrasemap file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let phrasemap = Self::from_json_str(&content)?;
        log::info!(
            "loaded {} phrases under {} labels from {}",
            phrasemap.len(),
            phrasemap.label_count(),
            path.display()
        );
        Ok(phrasemap)
    }

    /// Register a phrase under `label`; already registered phrases are ignored.
    pub fn insert<L, P>(&mut self, label: L, phrase: P) -> bool
    where
        L: Into<String>,
        P: Into<String>,
    {
        let phrase = phrase.into();
        let phrases = self.entries.entry(label.into()).or_default();
        if phrases.contains(&phrase) {
            return false;
        }
        phrases.push(phrase);
        true
    }

    /// Phrases registered under `label`.
    pub fn phrases(&self, label: &str) -> &[String] {
        self.entries.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(label, phrase)` pairs, labels sorted, phrases in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(label, phrases)| {
            phrases
                .iter()
                .map(move |phrase| (label.as_str(), phrase.as_str()))
        })
    }

    /// Total number of phrases.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.entries.len()
    }

    /// Check if no phrase is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add variants produced by `augment` for every registered phrase.
    ///
    /// `augment` receives the whitespace-separated words of one phrase and
    /// returns alternative word sequences; variants already registered under
    /// the same label are skipped. Returns the number of phrases added.
    pub fn expand<F>(&mut self, augment: F) -> usize
    where
        F: Fn(&[&str]) -> Vec<Vec<String>>,
    {
        let source: Vec<(String, String)> = self
            .iter()
            .map(|(label, phrase)| (label.to_string(), phrase.to_string()))
            .collect();

        let mut added = 0;
        for (label, phrase) in &source {
            let words: Vec<&str> = phrase.split_whitespace().collect();
            for variant in augment(&words) {
                if self.insert(label.as_str(), variant.join(" ")) {
                    added += 1;
                }
            }
        }

        log::info!("expanded to {} phrases ({} added)", self.len(), added);
        added
    }

    /// Turn every phrase into word slots using `analyzer`.
    pub fn to_phrases(&self, analyzer: &Analyzer) -> Result<Vec<Phrase>> {
        self.iter()
            .map(|(label, phrase)| {
                let words = analyzer
                    .analyze(phrase)?
                    .into_iter()
                    .map(|token| PhraseWord::new(token.forms))
                    .collect();
                Ok(Phrase::new(label, words))
            })
            .collect()
    }

    /// Compile the phrasemap into an automaton.
    pub fn compile(&self, analyzer: &Analyzer) -> Result<Automaton> {
        let mut builder = AutomatonBuilder::new();
        for phrase in self.to_phrases(analyzer)? {
            builder.add_phrase(phrase)?;
        }
        Ok(builder.build())
    }
}

impl<L, P> FromIterator<(L, P)> for PhraseMap
where
    L: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, P)>>(iter: I) -> Self {
        let mut phrasemap = PhraseMap::new();
        for (label, phrase) in iter {
            phrasemap.insert(label, phrase);
        }
        phrasemap
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn example() -> PhraseMap {
        PhraseMap::from_json_str(
            r#"{
                "single": ["drucken"],
                "double": ["druckt nicht", "wird getroffen"],
                "triple": ["will nicht starten"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_json() {
        let phrasemap = example();

        assert_eq!(phrasemap.len(), 4);
        assert_eq!(phrasemap.label_count(), 3);
        assert_eq!(phrasemap.phrases("double"), &["druckt nicht", "wird getroffen"]);
        assert!(phrasemap.phrases("missing").is_empty());
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(PhraseMap::from_json_str(r#"["drucken"]"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"single": ["drucken"]}}"#).unwrap();

        let phrasemap = PhraseMap::load_from_file(file.path()).unwrap();
        assert_eq!(phrasemap.phrases("single"), &["drucken"]);
    }

    #[test]
    fn test_missing_file() {
        let err = PhraseMap::load_from_file("/nonexistent/phrasemap.json").unwrap_err();
        assert!(matches!(err, ScaphraError::Config(_)));
    }

    #[test]
    fn test_expand_skips_known_variants() {
        let mut phrasemap = example();
        let added = phrasemap.expand(|words| {
            let mut reversed: Vec<String> = words.iter().map(|w| w.to_string()).collect();
            reversed.reverse();
            vec![reversed, words.iter().map(|w| w.to_string()).collect()]
        });

        // "drucken" reversed is itself; the other three phrases gain a variant
        assert_eq!(added, 3);
        assert_eq!(
            phrasemap.phrases("triple"),
            &["will nicht starten", "starten nicht will"]
        );
    }

    #[test]
    fn test_compile_with_analyzer() {
        let automaton = example().compile(&Analyzer::default()).unwrap();

        assert_eq!(automaton.phrase_count(), 4);
        let single = automaton.terminals("single");
        assert_eq!(single.len(), 1);

        let edge = automaton
            .edges()
            .iter()
            .find(|edge| edge.target() == single[0])
            .unwrap();
        assert!(edge.word().accepts("drucken"));
        assert!(edge.word().accepts("druck"));
    }

    #[test]
    fn test_blank_phrase_fails_compilation() {
        let phrasemap: PhraseMap = [("blank", "  ")].into_iter().collect();
        let err = phrasemap.compile(&Analyzer::default()).unwrap_err();
        assert!(matches!(err, ScaphraError::InvalidPattern(_)));
    }
}
