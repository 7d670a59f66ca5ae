//! Stemmer implementations.
//!
//! A stem is one of the normalized forms a token carries, next to its lemma.
//! Stemming raises recall where a lemmatizer alone misses inflected forms.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

pub mod cistem;
pub mod identity;

pub use cistem::CistemStemmer;
pub use identity::IdentityStemmer;

/// Stemmer selection used by configuration files and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StemmerKind {
    /// [`CistemStemmer`]
    #[default]
    Cistem,
    /// [`IdentityStemmer`]
    Identity,
}

impl StemmerKind {
    /// Instantiate the selected stemmer.
    pub fn build(self) -> Box<dyn Stemmer> {
        match self {
            StemmerKind::Cistem => Box::new(CistemStemmer::new()),
            StemmerKind::Identity => Box::new(IdentityStemmer::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stemmer_kind_build() {
        assert_eq!(StemmerKind::Cistem.build().name(), "cistem");
        assert_eq!(StemmerKind::Identity.build().name(), "identity");
    }

    #[test]
    fn test_stemmer_kind_serde() {
        let kind: StemmerKind = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(kind, StemmerKind::Identity);
    }
}
