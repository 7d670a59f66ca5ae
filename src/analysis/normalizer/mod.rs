//! Normalizers map a surface word to the forms phrase words are tested against.
//!
//! The matcher never looks at surface text. Both sides of a match, the
//! phrase words at compile time and the document tokens at scan time, are
//! reduced to sets of normalized forms by the same [`Normalizer`], and a
//! token satisfies a phrase word when the two sets intersect.

pub mod lemma;

pub use lemma::LemmaDictionary;

use crate::analysis::stemmer::{CistemStemmer, Stemmer};

/// Trait for normalizers producing the acceptable forms of a word.
pub trait Normalizer: Send + Sync {
    /// Normalized forms of `word`, without duplicates, in a stable order.
    fn forms(&self, word: &str) -> Vec<String>;

    /// Get the name of this normalizer.
    fn name(&self) -> &'static str;
}

/// Normalizer producing a lemma form and a stem form.
///
/// The lemma comes from an optional [`LemmaDictionary`] and falls back to
/// the lowercased word; the stem is computed from the lowercased word.
///
/// # Examples
///
/// ```
/// use scaphra::analysis::normalizer::{FormNormalizer, Normalizer};
///
/// let normalizer = FormNormalizer::new();
/// assert_eq!(normalizer.forms("Drucken"), vec!["drucken", "druck"]);
/// assert_eq!(normalizer.forms("nicht"), vec!["nicht", "nich"]);
/// ```
pub struct FormNormalizer {
    lemmas: Option<LemmaDictionary>,
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for FormNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormNormalizer")
            .field("lemmas", &self.lemmas.as_ref().map(LemmaDictionary::len))
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl FormNormalizer {
    /// Create a normalizer with the CISTEM stemmer and no lemma dictionary.
    pub fn new() -> Self {
        FormNormalizer {
            lemmas: None,
            stemmer: Box::new(CistemStemmer::new()),
        }
    }

    /// Create a normalizer with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        FormNormalizer {
            lemmas: None,
            stemmer,
        }
    }

    /// Attach a lemma dictionary.
    pub fn with_lemmas(mut self, lemmas: LemmaDictionary) -> Self {
        self.lemmas = Some(lemmas);
        self
    }

    /// The stemmer in use.
    pub fn stemmer(&self) -> &dyn Stemmer {
        self.stemmer.as_ref()
    }
}

impl Default for FormNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for FormNormalizer {
    fn forms(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let lemma = self
            .lemmas
            .as_ref()
            .and_then(|lemmas| lemmas.lemma(&lower))
            .map(str::to_string)
            .unwrap_or_else(|| lower.clone());
        let stem = self.stemmer.stem(&lower);

        let mut forms = vec![lemma];
        if !forms.contains(&stem) {
            forms.push(stem);
        }
        forms
    }

    fn name(&self) -> &'static str {
        "form"
    }
}
