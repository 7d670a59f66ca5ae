//! Token types for annotated token streams.
//!
//! A [`Token`] is the unit the matcher consumes: its surface text plus the
//! normalized forms (lemma, stem, ...) a phrase word may be satisfied by.
//! The matcher itself only needs the [`NormalizedForms`] shape, which is also
//! implemented for plain strings and string collections so callers with their
//! own tokenization can feed the engine directly.
//!
//! # Examples
//!
//! ```
//! use scaphra::analysis::token::{NormalizedForms, Token};
//!
//! let token = Token::with_offsets("Hobbits", 3, 10, 17).with_forms(["hobbit", "hobbits"]);
//! assert_eq!(token.position, 3);
//!
//! let mut seen = Vec::new();
//! token.for_each_form(&mut |form| seen.push(form.to_string()));
//! assert_eq!(seen, vec!["hobbit", "hobbits"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single analyzed token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface text of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Token type classification
    pub token_type: TokenType,

    /// Normalized forms a phrase word is tested against
    pub forms: Vec<String>,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Alphanumeric text
    Alphanum,
    /// Numeric values
    Num,
    /// Punctuation marks
    Punctuation,
    /// Other/unknown token types
    #[default]
    Other,
}

impl TokenType {
    /// Classify a word by its characters.
    pub fn detect(word: &str) -> TokenType {
        if word.is_empty() {
            return TokenType::Other;
        }

        if word.chars().all(|c| c.is_numeric()) {
            return TokenType::Num;
        }

        if word.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return TokenType::Alphanum;
        }

        if word.chars().all(|c| c.is_ascii_punctuation()) {
            return TokenType::Punctuation;
        }

        TokenType::Other
    }
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        Token {
            token_type: TokenType::detect(&text),
            text,
            position,
            start_offset: 0,
            end_offset: 0,
            forms: Vec::new(),
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            start_offset,
            end_offset,
            ..Token::new(text, position)
        }
    }

    /// Replace the normalized forms of this token.
    pub fn with_forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forms = forms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from a tokenizer.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// The shape the matcher requires of a token: a set of normalized forms.
///
/// Forms are visited rather than returned so implementors can hand out
/// borrowed strings from whatever storage they keep.
pub trait NormalizedForms {
    /// Call `visit` once per normalized form of this token.
    fn for_each_form(&self, visit: &mut dyn FnMut(&str));
}

impl NormalizedForms for Token {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        for form in &self.forms {
            visit(form);
        }
    }
}

impl NormalizedForms for str {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        visit(self);
    }
}

impl NormalizedForms for String {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        visit(self);
    }
}

impl<S: AsRef<str>> NormalizedForms for [S] {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        for form in self {
            visit(form.as_ref());
        }
    }
}

impl<S: AsRef<str>, const N: usize> NormalizedForms for [S; N] {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_form(visit);
    }
}

impl<S: AsRef<str>> NormalizedForms for Vec<S> {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_form(visit);
    }
}

impl<T: NormalizedForms + ?Sized> NormalizedForms for &T {
    fn for_each_form(&self, visit: &mut dyn FnMut(&str)) {
        (**self).for_each_form(visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_forms<T: NormalizedForms + ?Sized>(token: &T) -> Vec<String> {
        let mut forms = Vec::new();
        token.for_each_form(&mut |form| forms.push(form.to_string()));
        forms
    }

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello", 0);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 0);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 0);
        assert_eq!(token.token_type, TokenType::Alphanum);
        assert!(token.forms.is_empty());
    }

    #[test]
    fn test_token_with_offsets() {
        let token = Token::with_offsets("world", 1, 6, 11);
        assert_eq!(token.text, "world");
        assert_eq!(token.position, 1);
        assert_eq!(token.start_offset, 6);
        assert_eq!(token.end_offset, 11);
    }

    #[test]
    fn test_token_type_detection() {
        assert_eq!(TokenType::detect("42"), TokenType::Num);
        assert_eq!(TokenType::detect("Straße"), TokenType::Alphanum);
        assert_eq!(TokenType::detect("!?"), TokenType::Punctuation);
        assert_eq!(TokenType::detect("a+b"), TokenType::Other);
        assert_eq!(TokenType::detect(""), TokenType::Other);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("hello", 0);
        assert_eq!(format!("{token}"), "hello");
    }

    #[test]
    fn test_normalized_forms_impls() {
        let token = Token::new("Hobbits", 0).with_forms(["hobbit", "hobbits"]);
        assert_eq!(collect_forms(&token), vec!["hobbit", "hobbits"]);

        assert_eq!(collect_forms("start"), vec!["start"]);
        assert_eq!(collect_forms(&String::from("start")), vec!["start"]);
        assert_eq!(collect_forms(&["a", "b"]), vec!["a", "b"]);
        assert_eq!(collect_forms(&vec!["c".to_string()]), vec!["c"]);
    }
}
