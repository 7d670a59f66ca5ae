//! Command line argument parsing for the scaphra CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::stemmer::StemmerKind;
use crate::analysis::tokenizer::TokenizerKind;

/// scaphra - find scattered phrases in text
#[derive(Parser, Debug, Clone)]
#[command(name = "scaphra")]
#[command(about = "Find phrases whose words are scattered across a text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ScaphraArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ScaphraArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Match documents (one per line) against a phrasemap
    Match(MatchArgs),

    /// Compile a phrasemap into an automaton file
    Compile(CompileArgs),

    /// Show the normalized forms of words
    Stem(StemArgs),
}

/// Options shared by every command that builds an analyzer or automaton.
///
/// Explicit flags override the values of `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Matcher configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Phrasemap file (JSON object of label to phrases)
    #[arg(short, long, value_name = "PHRASEMAP_FILE")]
    pub phrasemap: Option<PathBuf>,

    /// Maximum token distance between consecutive phrase words
    #[arg(long, value_name = "TOKENS")]
    pub max_space: Option<usize>,

    /// Stemmer producing the stem form
    #[arg(long)]
    pub stemmer: Option<StemmerKind>,

    /// Tokenizer splitting text into words
    #[arg(long)]
    pub tokenizer: Option<TokenizerKind>,

    /// Regex matching a single token (replaces --tokenizer)
    #[arg(long, value_name = "REGEX")]
    pub token_pattern: Option<String>,

    /// Lemma dictionary file (JSON object of surface form to lemma)
    #[arg(long, value_name = "LEMMA_FILE")]
    pub lemmas: Option<PathBuf>,

    /// Keep phrase words within one clause (no line break, no unbalanced comma or parenthesis in between)
    #[arg(long)]
    pub clause_boundaries: bool,
}

/// Arguments for matching
#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Precompiled automaton to use instead of compiling the phrasemap
    #[arg(short, long, value_name = "AUTOMATON_FILE", conflicts_with = "phrasemap")]
    pub automaton: Option<PathBuf>,

    /// Input file with one document per line (default: stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Match documents in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Number of worker threads for parallel matching
    #[arg(short, long, requires = "parallel")]
    pub threads: Option<usize>,
}

/// Arguments for compiling
#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Output file for the compiled automaton
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: PathBuf,
}

/// Arguments for showing word forms
#[derive(Parser, Debug, Clone)]
pub struct StemArgs {
    /// Words to normalize
    #[arg(value_name = "WORD", required = true)]
    pub words: Vec<String>,

    /// Stemmer producing the stem form
    #[arg(long, default_value = "cistem")]
    pub stemmer: StemmerKind,

    /// Lemma dictionary file
    #[arg(long, value_name = "LEMMA_FILE")]
    pub lemmas: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
