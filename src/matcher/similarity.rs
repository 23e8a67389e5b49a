use ahash::AHashMap;
use log::{info, debug};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::subsystems::matcher::ScoringConfig;
use crate::error::{Error, Result};
use crate::types::{CharPair, Score};

/// Per-pair score overrides, keyed by the canonical unordered pair.
pub type SimilarityTable = AHashMap<CharPair, Score>;

/// Scores a pair of characters for the aligner's diagonal move.
///
/// Table entries win over the default scheme; any pair not in the table scores
/// `match_score` when both characters are equal and `mismatch_score` otherwise.
#[derive(Debug, Clone)]
pub struct SimilarityModel {
    match_score: Score,
    mismatch_score: Score,
    table: Option<SimilarityTable>,
}

impl SimilarityModel {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self {
            match_score: scoring.match_score,
            mismatch_score: scoring.mismatch_score,
            table: None,
        }
    }

    pub fn with_table(mut self, table: SimilarityTable) -> Self {
        if table.is_empty() {
            self.table = None;
        } else {
            debug!("Using similarity table with {} pair overrides", table.len());
            self.table = Some(table);
        }
        self
    }

    #[inline]
    pub fn similarity(&self, a: char, b: char) -> Score {
        if let Some(table) = &self.table {
            if let Some(score) = table.get(&CharPair::new(a, b)) {
                return *score;
            }
        }
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    pub fn match_score(&self) -> Score {
        self.match_score
    }

    pub fn table(&self) -> Option<&SimilarityTable> {
        self.table.as_ref()
    }

    /// Builds a table from two-character keys. Keys naming the same unordered
    /// pair with different scores are rejected.
    pub fn table_from_pairs<'k, I>(pairs: I) -> Result<SimilarityTable>
    where
        I: IntoIterator<Item = (&'k str, Score)>,
    {
        let mut table = SimilarityTable::new();
        for (key, score) in pairs {
            let pair = CharPair::from_key(key).ok_or_else(|| Error::Config(
                format!("Similarity key must be exactly two characters: {:?}", key)
            ))?;
            if let Some(existing) = table.insert(pair, score) {
                if existing != score {
                    return Err(Error::Config(format!(
                        "Conflicting similarity scores for pair {:?}: {} and {}",
                        pair.to_string(), existing, score
                    )));
                }
            }
        }
        Ok(table)
    }

    /// Parses a JSON object such as `{"ae": 2, "ij": 1}`.
    pub fn parse_table(json: &str) -> Result<SimilarityTable> {
        let raw: BTreeMap<String, Score> = serde_json::from_str(json)?;
        Self::table_from_pairs(raw.iter().map(|(key, score)| (key.as_str(), *score)))
    }

    pub fn load_table<P: AsRef<Path>>(path: P) -> Result<SimilarityTable> {
        let content = fs::read_to_string(&path)?;
        let table = Self::parse_table(&content)?;
        info!("Loaded {} similarity overrides from {:?}", table.len(), path.as_ref());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> SimilarityModel {
        SimilarityModel::new(&ScoringConfig::default())
    }

    #[test]
    fn test_default_scheme() {
        let model = model();
        assert_eq!(model.similarity('a', 'a'), 3);
        assert_eq!(model.similarity('a', 'b'), 0);
        assert_eq!(model.similarity(' ', ' '), 3);
        assert_eq!(model.match_score(), 3);
        assert!(model.table().is_none());
    }

    #[test]
    fn test_table_overrides_are_symmetric() {
        let table = SimilarityModel::table_from_pairs([("ea", 2), ("ss", 1)]).unwrap();
        let model = model().with_table(table);
        assert_eq!(model.table().map(|t| t.len()), Some(2));
        assert_eq!(model.similarity('a', 'e'), 2);
        assert_eq!(model.similarity('e', 'a'), 2);
        // Identity pairs can be overridden too
        assert_eq!(model.similarity('s', 's'), 1);
        assert_eq!(model.similarity('a', 'a'), 3);
    }

    #[test]
    fn test_symmetry_over_alphabet() {
        let table = SimilarityModel::table_from_pairs([("xy", -1), ("bz", 5), ("  ", 0)]).unwrap();
        let model = model().with_table(table);
        let alphabet: Vec<char> = "abxyz ".chars().collect();
        for &a in &alphabet {
            for &b in &alphabet {
                assert_eq!(model.similarity(a, b), model.similarity(b, a));
            }
        }
    }

    #[test]
    fn test_parse_table() {
        let table = SimilarityModel::parse_table(r#"{"ae": 2, "oö": 3}"#).unwrap();
        assert_eq!(table.get(&CharPair::new('e', 'a')), Some(&2));
        assert_eq!(table.get(&CharPair::new('ö', 'o')), Some(&3));
    }

    #[test]
    fn test_parse_table_rejects_bad_keys() {
        assert!(matches!(SimilarityModel::parse_table(r#"{"abc": 1}"#), Err(Error::Config(_))));
        assert!(matches!(SimilarityModel::parse_table(r#"{"ab": 1, "ba": 2}"#), Err(Error::Config(_))));
        assert!(matches!(SimilarityModel::parse_table("[1, 2]"), Err(Error::Json(_))));
        // Same pair, same score is fine
        assert!(SimilarityModel::parse_table(r#"{"ab": 1, "ba": 1}"#).is_ok());
    }
}
