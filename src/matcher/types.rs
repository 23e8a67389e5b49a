// types.rs
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use crate::types::{Score, SubstitutionCounts, TextRange, NO_MATCH_SCORE};

/// Outcome of aligning a query against one window of text.
/// Offsets are relative to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub relative_start: usize,
    pub match_length: usize,
    pub score: Score,
    pub substitutions: SubstitutionCounts,
}

impl Alignment {
    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

/// A query-length bucket of reference offsets and the trigram votes it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateWindow {
    pub window: usize,
    pub votes: usize,
}

/// Best span found for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub range: Option<TextRange<'a>>,
    pub score: Score,
    pub substitutions: SubstitutionCounts,
}

impl<'a> MatchResult<'a> {
    pub fn no_match() -> Self {
        Self {
            range: None,
            score: NO_MATCH_SCORE,
            substitutions: SubstitutionCounts::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.range.is_some()
    }

    pub fn substitution_total(&self) -> usize {
        self.substitutions.values().sum()
    }
}

// For serializing to JSONL output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleMatchResult {
    pub query: String,
    pub matched_text: Option<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub score: Score,
    pub substitutions: BTreeMap<String, usize>,
}

impl SimpleMatchResult {
    pub fn from_result(query: &str, result: &MatchResult<'_>) -> Self {
        Self {
            query: query.to_string(),
            matched_text: result.range.map(|range| range.text()),
            start: result.range.map(|range| range.start()),
            end: result.range.map(|range| range.end()),
            score: result.score,
            substitutions: result.substitutions
                .iter()
                .map(|(pair, count)| (pair.to_string(), *count))
                .collect(),
        }
    }
}
