//! Analyzer combining a tokenizer with a normalizer.
//!
//! ```text
//! Raw Text → Tokenizer → Tokens → Normalizer → Tokens with forms → Matcher
//! ```
//!
//! # Examples
//!
//! ```
//! use scaphra::analysis::analyzer::Analyzer;
//!
//! let analyzer = Analyzer::default();
//! let tokens = analyzer.analyze("Der Motor will nicht starten").unwrap();
//!
//! assert_eq!(tokens.len(), 5);
//! assert_eq!(tokens[4].forms, vec!["starten", "star"]);
//! ```

use std::fmt;

use crate::analysis::normalizer::{FormNormalizer, Normalizer};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;

/// Turns raw text into tokens annotated with normalized forms.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    normalizer: Box<dyn Normalizer>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("normalizer", &self.normalizer.name())
            .finish()
    }
}

impl Analyzer {
    /// Create an analyzer from a tokenizer and a normalizer.
    pub fn new(tokenizer: Box<dyn Tokenizer>, normalizer: Box<dyn Normalizer>) -> Self {
        Analyzer {
            tokenizer,
            normalizer,
        }
    }

    /// Tokenize `text` and attach normalized forms to every token.
    pub fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        let tokens = self
            .tokenizer
            .tokenize(text)?
            .map(|token| {
                let forms = self.normalizer.forms(&token.text);
                token.with_forms(forms)
            })
            .collect();
        Ok(tokens)
    }

    /// Normalized forms of a single phrase word.
    pub fn word_forms(&self, word: &str) -> Vec<String> {
        self.normalizer.forms(word)
    }

    /// The tokenizer in use.
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// The normalizer in use.
    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(
            Box::new(UnicodeWordTokenizer::new()),
            Box::new(FormNormalizer::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stemmer::IdentityStemmer;
    use crate::analysis::tokenizer::WhitespaceTokenizer;

    #[test]
    fn test_analyze_attaches_forms() {
        let analyzer = Analyzer::default();
        let tokens = analyzer.analyze("montags druckt die kiste nicht").unwrap();

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1].text, "druckt");
        assert_eq!(tokens[1].forms, vec!["druckt", "druck"]);
        assert_eq!(tokens[4].position, 4);
    }

    #[test]
    fn test_custom_components() {
        let analyzer = Analyzer::new(
            Box::new(WhitespaceTokenizer::new()),
            Box::new(FormNormalizer::with_stemmer(Box::new(IdentityStemmer::new()))),
        );
        let tokens = analyzer.analyze("Hobbits, live").unwrap();

        assert_eq!(tokens[0].forms, vec!["hobbits,"]);
        assert_eq!(analyzer.tokenizer().name(), "whitespace");
        assert_eq!(analyzer.normalizer().name(), "form");
    }

    #[test]
    fn test_empty_text() {
        let analyzer = Analyzer::default();
        assert!(analyzer.analyze("").unwrap().is_empty());
    }
}
