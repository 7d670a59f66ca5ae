//! Command implementations for the scaphra CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use crate::analysis::normalizer::{FormNormalizer, LemmaDictionary, Normalizer};
use crate::automaton::Automaton;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::MatcherConfig;
use crate::error::{Result, ScaphraError};
use crate::matcher::Matcher;
use crate::parallel::ParallelScanner;
use crate::phrasemap::PhraseMap;

/// Execute a CLI command.
pub fn execute_command(args: ScaphraArgs) -> Result<()> {
    match &args.command {
        Command::Match(match_args) => match_documents(match_args, &args),
        Command::Compile(compile_args) => compile_phrasemap(compile_args, &args),
        Command::Stem(stem_args) => stem_words(stem_args, &args),
    }
}

/// Merge the configuration file with explicit flags.
pub fn resolve_config(args: &AnalysisArgs) -> Result<MatcherConfig> {
    let mut config = match &args.config {
        Some(path) => MatcherConfig::load_from_file(path)?,
        None => MatcherConfig::default(),
    };

    if let Some(path) = &args.phrasemap {
        config.phrasemap = PhraseMap::load_from_file(path)?;
    }
    if let Some(max_space) = args.max_space {
        config.max_space = Some(max_space);
    }
    if let Some(stemmer) = args.stemmer {
        config.stemmer = stemmer;
    }
    if let Some(tokenizer) = args.tokenizer {
        config.tokenizer = tokenizer;
    }
    if let Some(pattern) = &args.token_pattern {
        config.token_pattern = Some(pattern.clone());
    }
    if let Some(lemmas) = &args.lemmas {
        config.lemmas = Some(lemmas.clone());
    }
    if args.clause_boundaries {
        config.clause_boundaries = true;
    }

    config.validate()?;
    Ok(config)
}

/// Match every input line against the configured phrases.
fn match_documents(args: &MatchArgs, cli_args: &ScaphraArgs) -> Result<()> {
    let config = resolve_config(&args.analysis)?;

    let matcher = match &args.automaton {
        Some(path) => Matcher::new(
            config.build_analyzer()?,
            Arc::new(Automaton::load(path)?),
            config.scan_config(),
        )?
        .with_clause_boundaries(config.clause_boundaries)?,
        None => {
            if config.phrasemap.is_empty() {
                return Err(ScaphraError::invalid_argument(
                    "No phrases to match. Use --phrasemap, --automaton or a config with a phrasemap.",
                ));
            }
            Matcher::from_config(&config)?
        }
    };

    let documents = load_documents(args.input.as_deref())?;
    log::info!("read {} documents", documents.len());

    let start_time = Instant::now();
    let results = if args.parallel {
        let scanner = ParallelScanner::new(Arc::new(matcher), args.threads)?;
        scanner.map_documents(&documents, match_document)?
    } else {
        documents
            .iter()
            .enumerate()
            .map(|(index, text)| match_document(&matcher, index, text))
            .collect::<Result<Vec<_>>>()?
    };
    let duration = start_time.elapsed();

    output_result(
        "Matching finished",
        &MatchResults {
            documents: documents.len(),
            total_matches: results.iter().map(|r| r.matches.len()).sum(),
            duration_ms: duration.as_millis() as u64,
            results,
        },
        cli_args,
    )
}

/// Match a single document and keep the surface words of every match.
fn match_document(matcher: &Matcher, index: usize, text: &str) -> Result<DocumentMatches> {
    let tokens = matcher.analyzer().analyze(text)?;
    let matches = matcher
        .match_analyzed(text, &tokens)
        .iter()
        .map(|matched| MatchRecord::new(matched, |position| tokens[position].text.clone()))
        .collect();

    Ok(DocumentMatches {
        document: index,
        tokens: tokens.len(),
        matches,
    })
}

/// Read documents from `input`, or from stdin if there is none.
fn load_documents(input: Option<&Path>) -> Result<Vec<String>> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open input '{}'", path.display()))?;
            read_documents(BufReader::new(file))
        }
        None => read_documents(io::stdin().lock()),
    }
}

/// One document per line; a trailing carriage return is dropped.
fn read_documents<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .map(|line| {
            let mut line = line?;
            if line.ends_with('\r') {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}

/// Compile a phrasemap and save the automaton.
fn compile_phrasemap(args: &CompileArgs, cli_args: &ScaphraArgs) -> Result<()> {
    let config = resolve_config(&args.analysis)?;
    if config.phrasemap.is_empty() {
        return Err(ScaphraError::invalid_argument(
            "No phrases to compile. Use --phrasemap or a config with a phrasemap.",
        ));
    }

    let start_time = Instant::now();
    let analyzer = config.build_analyzer()?;
    let automaton = config.phrasemap.compile(&analyzer)?;
    save_automaton(&automaton, &args.output)?;
    let duration = start_time.elapsed();

    output_result(
        "Phrasemap compiled successfully",
        &CompileResult {
            output: args.output.to_string_lossy().to_string(),
            phrases: automaton.phrase_count(),
            labels: automaton.labels().count(),
            nodes: automaton.node_count(),
            edges: automaton.edge_count(),
            max_depth: automaton.max_depth(),
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

fn save_automaton(automaton: &Automaton, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create output directory '{}'", parent.display()))?;
    }
    automaton.save(path)
}

/// Print the normalized forms of each word.
fn stem_words(args: &StemArgs, cli_args: &ScaphraArgs) -> Result<()> {
    let mut normalizer = FormNormalizer::with_stemmer(args.stemmer.build());
    if let Some(path) = &args.lemmas {
        normalizer = normalizer.with_lemmas(LemmaDictionary::load_from_file(path)?);
    }

    let words = args
        .words
        .iter()
        .map(|word| WordForms {
            word: word.clone(),
            forms: normalizer.forms(word),
        })
        .collect();

    output_result(
        "Normalized forms",
        &StemResults {
            stemmer: normalizer.stemmer().name().to_string(),
            words,
        },
        cli_args,
    )
}
