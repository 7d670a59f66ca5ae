//! Error types for the Scaphra library.
//!
//! All errors are represented by the [`ScaphraError`] enum. Pattern
//! compilation is strict and fails fast with [`ScaphraError::InvalidPattern`];
//! scanning a token stream never fails.
//!
//! # Examples
//!
//! ```
//! use scaphra::error::{Result, ScaphraError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ScaphraError::invalid_pattern("phrase 'empty' has no words"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Scaphra operations.
#[derive(Error, Debug)]
pub enum ScaphraError {
    /// I/O errors (phrasemap files, dictionaries, saved automata)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A phrase that cannot be compiled (no words, or a word with no forms)
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Analysis-related errors (tokenization, normalization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Error with context added at the command line boundary
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ScaphraError.
pub type Result<T> = std::result::Result<T, ScaphraError>;

impl ScaphraError {
    /// Create a new invalid pattern error.
    pub fn invalid_pattern<S: Into<String>>(msg: S) -> Self {
        ScaphraError::InvalidPattern(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Config(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Serialization(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Config(format!("Parse error: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ScaphraError::Other(format!("Invalid argument: {}", msg.into()))
    }
}

impl From<bincode::Error> for ScaphraError {
    fn from(err: bincode::Error) -> Self {
        ScaphraError::Serialization(err.to_string())
    }
}
