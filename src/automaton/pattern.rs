//! Phrase patterns: labeled sequences of word slots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::token::NormalizedForms;
use crate::error::{Result, ScaphraError};

/// One slot of a phrase: the set of normalized forms that satisfy it.
///
/// A token satisfies the slot when any of its forms is in the set. Two words
/// with identical form sets are the same equivalence class and share trie
/// edges when they occur at the same prefix.
///
/// # Examples
///
/// ```
/// use scaphra::automaton::pattern::PhraseWord;
///
/// let word = PhraseWord::new(["hobbit", "hobbits"]);
/// assert!(word.accepts("hobbits"));
/// assert!(word.accepts_token(&["hobbitses", "hobbit"]));
/// assert!(!word.accepts("dwarf"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhraseWord {
    forms: BTreeSet<String>,
}

impl PhraseWord {
    /// Create a word slot accepting any of `forms`.
    pub fn new<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PhraseWord {
            forms: forms.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a word slot accepting exactly one form.
    pub fn single<S: Into<String>>(form: S) -> Self {
        Self::new([form])
    }

    /// Iterate over the accepted forms in sorted order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(String::as_str)
    }

    /// Check whether a single normalized form satisfies this slot.
    pub fn accepts(&self, form: &str) -> bool {
        self.forms.contains(form)
    }

    /// Check whether any form of `token` satisfies this slot.
    pub fn accepts_token<T: NormalizedForms + ?Sized>(&self, token: &T) -> bool {
        let mut accepted = false;
        token.for_each_form(&mut |form| accepted |= self.accepts(form));
        accepted
    }

    /// Number of accepted forms.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// A slot without forms can never be satisfied and is rejected at compile time.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// A labeled, ordered sequence of word slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    label: String,
    words: Vec<PhraseWord>,
}

impl Phrase {
    /// Create a phrase from explicit word slots.
    pub fn new<S: Into<String>>(label: S, words: Vec<PhraseWord>) -> Self {
        Phrase {
            label: label.into(),
            words,
        }
    }

    /// Create a phrase whose slots each accept exactly the given word.
    pub fn from_words<S: Into<String>>(label: S, words: &[&str]) -> Self {
        Phrase::new(label, words.iter().map(|w| PhraseWord::single(*w)).collect())
    }

    /// The caller-supplied label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The word slots in order.
    pub fn words(&self) -> &[PhraseWord] {
        &self.words
    }

    /// Split into label and word slots.
    pub fn into_parts(self) -> (String, Vec<PhraseWord>) {
        (self.label, self.words)
    }

    /// Number of word slots.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the phrase has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reject phrases that can never match.
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(ScaphraError::invalid_pattern(format!(
                "phrase '{}' has no words",
                self.label
            )));
        }

        if let Some(slot) = self.words.iter().position(PhraseWord::is_empty) {
            return Err(ScaphraError::invalid_pattern(format!(
                "word {} of phrase '{}' accepts no forms",
                slot, self.label
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_word_equivalence() {
        let a = PhraseWord::new(["hobbits", "hobbit"]);
        let b = PhraseWord::new(["hobbit", "hobbits", "hobbit"]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.forms().collect::<Vec<_>>(), vec!["hobbit", "hobbits"]);
    }

    #[test]
    fn test_from_words() {
        let phrase = Phrase::from_words("problem", &["not", "start"]);

        assert_eq!(phrase.label(), "problem");
        assert_eq!(phrase.len(), 2);
        assert!(phrase.words()[1].accepts("start"));
        assert!(phrase.validate().is_ok());

        let (label, words) = phrase.into_parts();
        assert_eq!(label, "problem");
        assert_eq!(words, vec![PhraseWord::single("not"), PhraseWord::single("start")]);
    }

    #[test]
    fn test_empty_phrase_is_invalid() {
        let phrase = Phrase::new("empty", Vec::new());
        let err = phrase.validate().unwrap_err();
        assert!(matches!(err, ScaphraError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_word_is_invalid() {
        let phrase = Phrase::new(
            "hole",
            vec![PhraseWord::single("in"), PhraseWord::new(Vec::<String>::new())],
        );
        let err = phrase.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pattern: word 1 of phrase 'hole' accepts no forms"
        );
    }
}
