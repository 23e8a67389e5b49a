// src/config/subsystems/matcher.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::config::FromIni;
use crate::types::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub match_score: Score,
    pub mismatch_score: Score,
    // Vertical move: a query character with no counterpart in the text
    pub delete_score: Score,
    // Horizontal move: a text character with no counterpart in the query
    pub insert_score: Score,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: 3,
            mismatch_score: 0,
            delete_score: -4,
            insert_score: -4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    // Upper bound on ranked windows handed to the aligner
    pub max_candidates: usize,
    // Minimum votes(current) / votes(previous accepted) to keep scanning
    pub candidate_threshold: f64,
    pub scoring: ScoringConfig,
    // Optional JSON object of two-character keys to pair scores
    pub similarities_file: Option<PathBuf>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_candidates: 10,
            candidate_threshold: 0.92,
            scoring: ScoringConfig::default(),
            similarities_file: None,
        }
    }
}

fn parse_score(key: &str, value: &str) -> Result<Score> {
    value.parse::<Score>().map_err(|_| Error::Config(
        format!("Invalid {} (must be an integer): {}", key, value)
    ))
}

impl FromIni for MatcherConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        // Only handle matcher or matcher.scoring sections
        if !section_name.starts_with("matcher") {
            return None;
        }

        match (section_name, key) {
            ("matcher", "max_candidates") => {
                match value.parse::<usize>() {
                    Ok(count) if count > 0 => {
                        self.max_candidates = count;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid max_candidates (must be > 0): {}", value)
                    ))),
                }
            },
            ("matcher", "candidate_threshold") => {
                match value.parse::<f64>() {
                    Ok(threshold) if threshold.is_finite() && threshold >= 0.0 => {
                        self.candidate_threshold = threshold;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid candidate_threshold (must be >= 0): {}", value)
                    ))),
                }
            },
            ("matcher", "similarities_file") => {
                let cleaned_value = value.trim_matches('"');
                self.similarities_file = if cleaned_value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(cleaned_value))
                };
                Some(Ok(()))
            },

            // Scoring settings
            ("matcher.scoring", "match_score") => Some(
                parse_score(key, value).map(|score| self.scoring.match_score = score)
            ),
            ("matcher.scoring", "mismatch_score") => Some(
                parse_score(key, value).map(|score| self.scoring.mismatch_score = score)
            ),
            ("matcher.scoring", "delete_score") => Some(
                parse_score(key, value).map(|score| self.scoring.delete_score = score)
            ),
            ("matcher.scoring", "insert_score") => Some(
                parse_score(key, value).map(|score| self.scoring.insert_score = score)
            ),

            // Unknown key
            _ => None,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(Error::Config(
                "max_candidates must be greater than 0".to_string()
            ));
        }
        if !self.candidate_threshold.is_finite() || self.candidate_threshold < 0.0 {
            return Err(Error::Config(
                format!("candidate_threshold must be a non-negative number, got {}", self.candidate_threshold)
            ));
        }
        if self.scoring.match_score <= 0 {
            return Err(Error::Config(
                "match_score must be positive or no alignment can ever score".to_string()
            ));
        }
        if let Some(path) = &self.similarities_file {
            if !path.exists() {
                return Err(Error::Config(
                    format!("Similarities file does not exist: {:?}", path)
                ));
            }
        }
        Ok(())
    }
}
