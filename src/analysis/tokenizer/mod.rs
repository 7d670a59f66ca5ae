//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split raw text into [`Token`](crate::analysis::token::Token)s
//! with dense 0-based positions. They produce surface text only; normalized
//! forms are attached afterwards by a
//! [`Normalizer`](crate::analysis::normalizer::Normalizer).
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//! - [`regex::RegexTokenizer`] - Custom regex-based tokenization
//!
//! # Examples
//!
//! ```
//! use scaphra::analysis::tokenizer::Tokenizer;
//! use scaphra::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so an analyzer can be shared across the
/// worker threads of a parallel match.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod unicode_word;
pub mod whitespace;

pub use self::regex::RegexTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;

/// Tokenizer selection used by configuration files and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// [`WhitespaceTokenizer`]
    Whitespace,
    /// [`UnicodeWordTokenizer`]
    #[default]
    #[serde(alias = "unicode")]
    #[value(alias = "unicode")]
    UnicodeWord,
}

impl TokenizerKind {
    /// Instantiate the selected tokenizer.
    pub fn build(self) -> Box<dyn Tokenizer> {
        match self {
            TokenizerKind::Whitespace => Box::new(WhitespaceTokenizer::new()),
            TokenizerKind::UnicodeWord => Box::new(UnicodeWordTokenizer::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_kind_accepts_short_name() {
        let kind: TokenizerKind = serde_json::from_str("\"unicode\"").unwrap();
        assert_eq!(kind, TokenizerKind::UnicodeWord);

        let kind: TokenizerKind = serde_json::from_str("\"whitespace\"").unwrap();
        assert_eq!(kind.build().name(), "whitespace");
    }
}
