//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::automaton::Match;
use crate::cli::args::{OutputFormat, ScaphraArgs};
use crate::error::Result;

/// A single match as reported by `scaphra match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub name: String,
    pub label: String,
    pub positions: Vec<usize>,
    pub spans: Vec<(usize, usize)>,
    pub words: Vec<String>,
}

impl MatchRecord {
    /// Build a record, taking the surface words from `words_at`.
    pub fn new<F>(matched: &Match, words_at: F) -> Self
    where
        F: Fn(usize) -> String,
    {
        MatchRecord {
            name: matched.name(),
            label: matched.label.clone(),
            positions: matched.positions.clone(),
            spans: matched.spans(),
            words: matched.positions.iter().map(|&p| words_at(p)).collect(),
        }
    }
}

/// Matches of one input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMatches {
    pub document: usize,
    pub tokens: usize,
    pub matches: Vec<MatchRecord>,
}

/// Result structure for match operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResults {
    pub documents: usize,
    pub total_matches: usize,
    pub duration_ms: u64,
    pub results: Vec<DocumentMatches>,
}

/// Result structure for compilation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompileResult {
    pub output: String,
    pub phrases: usize,
    pub labels: usize,
    pub nodes: usize,
    pub edges: usize,
    pub max_depth: usize,
    pub duration_ms: u64,
}

/// Normalized forms of one word.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordForms {
    pub word: String,
    pub forms: Vec<String>,
}

/// Result structure for the stem command.
#[derive(Debug, Serialize, Deserialize)]
pub struct StemResults {
    pub stemmer: String,
    pub words: Vec<WordForms>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Write the result to `out`.
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl HumanOutput for MatchResults {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for document in &self.results {
            for record in &document.matches {
                let (start, end) = match (record.positions.first(), record.positions.last()) {
                    (Some(&start), Some(&end)) => (start, end),
                    _ => (0, 0),
                };
                writeln!(
                    out,
                    "{}\t{}\t[{}-{}]\t{}",
                    document.document,
                    record.label,
                    start,
                    end,
                    record.words.join(" ")
                )?;
            }
        }
        writeln!(
            out,
            "{} matches in {} documents ({} ms)",
            self.total_matches, self.documents, self.duration_ms
        )
    }
}

impl HumanOutput for CompileResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Output: {}", self.output)?;
        writeln!(out, "Phrases: {}", self.phrases)?;
        writeln!(out, "Labels: {}", self.labels)?;
        writeln!(out, "Nodes: {}", self.nodes)?;
        writeln!(out, "Edges: {}", self.edges)?;
        writeln!(out, "Longest phrase: {} words", self.max_depth)?;
        writeln!(out, "Duration: {} ms", self.duration_ms)
    }
}

impl HumanOutput for StemResults {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for word in &self.words {
            writeln!(out, "{}\t{}", word.word, word.forms.join(" "))?;
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &ScaphraArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args, &mut out),
        OutputFormat::Json => output_json(result, args, &mut out),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(
    message: &str,
    result: &T,
    args: &ScaphraArgs,
    out: &mut dyn Write,
) -> Result<()> {
    if args.verbosity() > 1 {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }
    result.write_human(out)?;
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ScaphraArgs, out: &mut dyn Write) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}
