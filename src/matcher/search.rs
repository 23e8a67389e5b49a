// src/matcher/search.rs

use ahash::AHashMap;
use log::{debug, trace};

use crate::config::subsystems::matcher::{MatcherConfig, ScoringConfig};
use crate::error::Result;
use crate::ngram::{TrigramGenerator, TrigramIndex};
use crate::types::{TextRange, NO_MATCH_SCORE};
use super::algorithms::SmithWaterman;
use super::similarity::{SimilarityModel, SimilarityTable};
use super::types::{CandidateWindow, MatchResult};

// Vote count the first candidate is compared against, so it is always kept
const INITIAL_WINDOW_VOTES: f64 = 0.1;

/// Fuzzy search engine over one immutable reference text.
///
/// Construction indexes every trigram of the text. Each query votes for
/// query-length windows of the text through shared trigrams, and the
/// best-voted windows are aligned with Smith–Waterman to find the span.
/// The engine holds no mutable state, so queries may run concurrently.
#[derive(Debug, Clone)]
pub struct FuzzySearch {
    text: Vec<char>,
    index: TrigramIndex,
    max_candidates: usize,
    candidate_threshold: f64,
    scoring: ScoringConfig,
    similarity: SimilarityModel,
}

impl FuzzySearch {
    pub fn new(text: &str, config: &MatcherConfig) -> Self {
        let text: Vec<char> = text.chars().collect();
        let index = TrigramIndex::build(&text);
        Self {
            text,
            index,
            max_candidates: config.max_candidates,
            candidate_threshold: config.candidate_threshold,
            scoring: config.scoring,
            similarity: SimilarityModel::new(&config.scoring),
        }
    }

    pub fn with_similarities(mut self, table: SimilarityTable) -> Self {
        self.similarity = self.similarity.with_table(table);
        self
    }

    /// Builds the engine and loads `similarities_file` when the config names one.
    pub fn from_config(text: &str, config: &MatcherConfig) -> Result<Self> {
        let engine = Self::new(text, config);
        match &config.similarities_file {
            Some(path) => Ok(engine.with_similarities(SimilarityModel::load_table(path)?)),
            None => Ok(engine),
        }
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn index(&self) -> &TrigramIndex {
        &self.index
    }

    pub fn similarity(&self) -> &SimilarityModel {
        &self.similarity
    }

    pub fn find_best_in_text(&self, query: &str) -> Result<MatchResult<'_>> {
        self.find_best(query, 0, None)
    }

    /// Best approximate occurrence of `query` among windows whose trigram
    /// occurrences fall in `[start, stop]`. `stop` defaults to the text length.
    pub fn find_best(&self, query: &str, start: usize, stop: Option<usize>) -> Result<MatchResult<'_>> {
        let query: Vec<char> = query.chars().collect();
        let stop = self.clamp_stop(stop);
        if query.is_empty() || self.text.is_empty() || start > stop {
            debug!("Degenerate query (query {} chars, bounds {}..{}), no match", query.len(), start, stop);
            return Ok(MatchResult::no_match());
        }

        let window_size = query.len();
        let aligner = SmithWaterman::new(&self.similarity, &self.scoring);
        let mut best = MatchResult::no_match();
        let mut best_score = NO_MATCH_SCORE;

        for candidate in self.select_windows(&query, start, stop) {
            let (interval_start, interval_end) = interval_bounds(candidate.window, window_size, start, stop);
            if interval_start >= interval_end {
                continue;
            }

            let alignment = aligner.align(&query, &self.text[interval_start..interval_end])?;
            let match_start = interval_start + alignment.relative_start;
            trace!(
                "Window {} ({} votes) over {}..{}: score {} at {}+{}",
                candidate.window, candidate.votes, interval_start, interval_end,
                alignment.score, match_start, alignment.match_length
            );

            if alignment.score > best_score {
                best_score = alignment.score;
                best = MatchResult {
                    range: alignment.is_match().then(|| {
                        TextRange::new(&self.text, match_start, match_start + alignment.match_length)
                    }),
                    score: alignment.score,
                    substitutions: alignment.substitutions,
                };
            }
        }

        match &best.range {
            Some(range) => debug!("Best match {} with score {}", range, best.score),
            None => debug!("No positive alignment (best score {})", best.score),
        }
        Ok(best)
    }

    /// Every window that shares a trigram with `query` inside `[start, stop]`,
    /// ranked by votes descending, then by window index ascending.
    pub fn candidate_windows(&self, query: &str, start: usize, stop: Option<usize>) -> Vec<CandidateWindow> {
        let query: Vec<char> = query.chars().collect();
        let stop = self.clamp_stop(stop);
        if query.is_empty() || start > stop {
            return Vec::new();
        }
        self.rank_windows(&query, start, stop)
    }

    /// The ranked windows that survive the `max_candidates` cut and ratio pruning.
    pub fn select_candidates(&self, query: &str, start: usize, stop: Option<usize>) -> Vec<CandidateWindow> {
        let query: Vec<char> = query.chars().collect();
        let stop = self.clamp_stop(stop);
        if query.is_empty() || start > stop {
            return Vec::new();
        }
        self.select_windows(&query, start, stop)
    }

    fn clamp_stop(&self, stop: Option<usize>) -> usize {
        stop.map_or(self.text.len(), |stop| stop.min(self.text.len()))
    }

    fn rank_windows(&self, query: &[char], start: usize, stop: usize) -> Vec<CandidateWindow> {
        let window_size = query.len();
        let mut votes: AHashMap<usize, usize> = AHashMap::new();

        for (_, key) in TrigramGenerator::new().generate(query) {
            for &occurrence in self.index.occurrences(&key) {
                if occurrence < start || occurrence > stop {
                    continue;
                }
                *votes.entry(occurrence / window_size).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<CandidateWindow> = votes
            .into_iter()
            .map(|(window, votes)| CandidateWindow { window, votes })
            .collect();
        ranked.sort_unstable_by(|a, b| b.votes.cmp(&a.votes).then(a.window.cmp(&b.window)));
        ranked
    }

    fn select_windows(&self, query: &[char], start: usize, stop: usize) -> Vec<CandidateWindow> {
        let ranked = self.rank_windows(query, start, stop);
        let mut selected = Vec::with_capacity(self.max_candidates.min(ranked.len()));
        let mut last_window_votes = INITIAL_WINDOW_VOTES;

        for candidate in ranked.iter().take(self.max_candidates) {
            let ratio = candidate.votes as f64 / last_window_votes;
            if ratio < self.candidate_threshold {
                trace!(
                    "Pruned at window {} ({} votes, ratio {:.3} < {})",
                    candidate.window, candidate.votes, ratio, self.candidate_threshold
                );
                break;
            }
            last_window_votes = candidate.votes as f64;
            selected.push(*candidate);
        }

        debug!("{} of {} candidate windows selected", selected.len(), ranked.len());
        selected
    }
}

/// Text slice aligned for `window`: half a window before it through one and a
/// half windows after it, clamped to `[start, stop]`.
fn interval_bounds(window: usize, window_size: usize, start: usize, stop: usize) -> (usize, usize) {
    let nominal = window * window_size;
    let interval_start = start.max(nominal.saturating_sub((window_size + 1) / 2));
    let interval_end = stop.min(nominal + window_size + window_size / 2);
    (interval_start, interval_end)
}
