// src/matcher/parallel.rs

use rayon::prelude::*;
use log::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use super::search::FuzzySearch;
use super::types::MatchResult;

/// Runs independent queries against one engine on a rayon pool.
///
/// Every query allocates its own alignment grids, so the only shared state is
/// the read-only engine. Results come back in input order and a fault in one
/// query is reported in that query's slot only.
pub struct ParallelSearcher<'a> {
    engine: &'a FuzzySearch,
    thread_pool: Option<Arc<rayon::ThreadPool>>,
}

impl<'a> ParallelSearcher<'a> {
    /// `thread_count` of 0 uses rayon's global pool.
    pub fn new(engine: &'a FuzzySearch, thread_count: usize) -> Result<Self> {
        let thread_pool = if thread_count > 0 {
            Some(rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build()?)
        } else {
            None // Use rayon's default thread pool
        };

        Ok(Self {
            engine,
            thread_pool: thread_pool.map(Arc::new),
        })
    }

    pub fn find_best_batch<Q>(&self, queries: &[Q]) -> Vec<Result<MatchResult<'a>>>
    where
        Q: AsRef<str> + Sync,
    {
        self.find_best_batch_with_progress(queries, 0, None, |_| {})
    }

    /// Searches every query within `[start, stop]`, calling `on_done` with the
    /// number of finished queries each time one completes.
    pub fn find_best_batch_with_progress<Q, F>(
        &self,
        queries: &[Q],
        start: usize,
        stop: Option<usize>,
        on_done: F,
    ) -> Vec<Result<MatchResult<'a>>>
    where
        Q: AsRef<str> + Sync,
        F: Fn(usize) + Sync,
    {
        let start_time = Instant::now();
        let completed = AtomicUsize::new(0);
        let engine = self.engine;

        let run = || {
            queries
                .par_iter()
                .map(|query| {
                    let result = engine.find_best(query.as_ref(), start, stop);
                    if let Err(e) = &result {
                        warn!("Query {:?} failed: {}", query.as_ref(), e);
                    }
                    on_done(completed.fetch_add(1, Ordering::Relaxed) + 1);
                    result
                })
                .collect::<Vec<_>>()
        };

        let results = match &self.thread_pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let matched = results.iter().filter(|r| matches!(r, Ok(m) if m.is_match())).count();
        info!(
            "Searched {} queries in {:.2?}: {} matched",
            queries.len(), start_time.elapsed(), matched
        );
        results
    }
}
