//! Cross-document parallel matching.
//!
//! A single document is always scanned sequentially; parallelism comes from
//! scanning many documents at once against one shared automaton. Each worker
//! owns its own scan state, so no locking happens on the hot path.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::analysis::token::NormalizedForms;
use crate::automaton::{Automaton, Match, ScanConfig};
use crate::error::{Result, ScaphraError};
use crate::matcher::Matcher;

/// Scan pre-tokenized documents in parallel on the global rayon pool.
///
/// Results are returned in document order.
pub fn scan_all<D, T>(automaton: &Automaton, config: ScanConfig, documents: &[D]) -> Vec<Vec<Match>>
where
    D: AsRef<[T]> + Sync,
    T: NormalizedForms + Sync,
{
    documents
        .par_iter()
        .map(|document| automaton.scan_with(document.as_ref(), config).collect())
        .collect()
}

/// Runs a [`Matcher`] over document batches on a dedicated thread pool.
pub struct ParallelScanner {
    /// Shared matcher.
    matcher: Arc<Matcher>,

    /// Thread pool for parallel execution.
    thread_pool: Arc<ThreadPool>,
}

impl ParallelScanner {
    /// Create a scanner with `threads` workers.
    /// If None, rayon picks the number of CPU cores.
    pub fn new(matcher: Arc<Matcher>, threads: Option<usize>) -> Result<Self> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|i| format!("scaphra-scan-{i}"))
            .build()
            .map_err(|e| ScaphraError::other(format!("Failed to create thread pool: {e}")))?;

        log::debug!(
            "parallel scanner started with {} threads",
            thread_pool.current_num_threads()
        );

        Ok(Self {
            matcher,
            thread_pool: Arc::new(thread_pool),
        })
    }

    /// The shared matcher.
    pub fn matcher(&self) -> &Arc<Matcher> {
        &self.matcher
    }

    /// Number of worker threads.
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Apply `f` to every `(index, document)` pair on this scanner's pool.
    ///
    /// Results are returned in document order; the first error aborts the batch.
    pub fn map_documents<S, R, F>(&self, documents: &[S], f: F) -> Result<Vec<R>>
    where
        S: AsRef<str> + Sync,
        R: Send,
        F: Fn(&Matcher, usize, &str) -> Result<R> + Sync,
    {
        let matcher = self.matcher.as_ref();
        self.thread_pool.install(|| {
            documents
                .par_iter()
                .enumerate()
                .map(|(index, document)| f(matcher, index, document.as_ref()))
                .collect()
        })
    }

    /// Analyze and match every document, returning results in document order.
    pub fn match_documents<S>(&self, documents: &[S]) -> Result<Vec<Vec<Match>>>
    where
        S: AsRef<str> + Sync,
    {
        let results =
            self.map_documents(documents, |matcher, _, text| matcher.match_text(text))?;

        log::info!(
            "matched {} documents, {} matches",
            results.len(),
            results.iter().map(Vec::len).sum::<usize>()
        );
        Ok(results)
    }

    /// Scan pre-tokenized documents on this scanner's pool.
    pub fn scan_documents<D, T>(&self, documents: &[D]) -> Vec<Vec<Match>>
    where
        D: AsRef<[T]> + Sync,
        T: NormalizedForms + Sync,
    {
        let automaton = self.matcher.automaton();
        let config = self.matcher.scan_config();
        self.thread_pool
            .install(|| scan_all(automaton, config, documents))
    }
}
