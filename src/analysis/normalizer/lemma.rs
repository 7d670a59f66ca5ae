//! Lemma dictionary for surface-to-lemma lookup.
//!
//! Stands in for a statistical lemmatizer: a flat mapping from lowercased
//! surface forms to lemmas, loaded from a JSON object such as
//!
//! ```json
//! { "druckt": "drucken", "hobbits": "hobbit" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use ahash::RandomState;

use crate::error::{Result, ScaphraError};

/// Surface form → lemma lookup table.
#[derive(Debug, Clone, Default)]
pub struct LemmaDictionary {
    lemmas: HashMap<String, String, RandomState>,
}

impl LemmaDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from `(surface, lemma)` pairs. Surface forms are lowercased.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut dictionary = Self::new();
        for (surface, lemma) in pairs {
            dictionary.insert(surface.as_ref(), lemma);
        }
        dictionary
    }

    /// Parse a dictionary from a JSON object string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let pairs: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| ScaphraError::parse(format!("Failed to parse lemma dictionary: {e}")))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Load a dictionary from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaphraError::config(format!(
                "Failed to read lemma dictionary file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let dictionary = Self::from_json_str(&content)?;
        log::info!(
            "loaded {} lemmas from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Add or replace a lemma.
    pub fn insert<V: Into<String>>(&mut self, surface: &str, lemma: V) {
        self.lemmas.insert(surface.to_lowercase(), lemma.into());
    }

    /// Look up the lemma of a lowercased surface form.
    pub fn lemma(&self, surface: &str) -> Option<&str> {
        self.lemmas.get(surface).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Check if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_from_pairs_lowercases_surface() {
        let dictionary = LemmaDictionary::from_pairs([("Hobbits", "hobbit")]);
        assert_eq!(dictionary.lemma("hobbits"), Some("hobbit"));
        assert_eq!(dictionary.lemma("Hobbits"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"druckt": "drucken", "startet": "starten"}}"#).unwrap();

        let dictionary = LemmaDictionary::load_from_file(file.path()).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.lemma("startet"), Some("starten"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(LemmaDictionary::from_json_str("[1, 2]").is_err());
    }
}
