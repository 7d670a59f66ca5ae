//! Text analysis for Scaphra.
//!
//! This module provides the reference normalizer adapter: tokenization,
//! stemming, lemma lookup, and the [`Analyzer`](analyzer::Analyzer) that
//! combines them into tokens annotated with normalized forms. The matcher
//! depends only on [`NormalizedForms`](token::NormalizedForms), so any
//! external pipeline can take the place of this module.

pub mod analyzer;
pub mod normalizer;
pub mod stemmer;
pub mod token;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use token::{NormalizedForms, Token, TokenStream, TokenType};
