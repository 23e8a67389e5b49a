// src/ngram/index.rs

use ahash::AHashMap;
use log::{debug, info};

use super::generator::TrigramGenerator;
use super::types::{IndexStats, Trigram};

/// Occurrence lists for every trigram of a padded reference text.
///
/// Built once and read-only afterwards. Each bucket holds offsets in scan
/// order, so buckets are ascending and may repeat a trigram any number of times.
#[derive(Debug, Clone, Default)]
pub struct TrigramIndex {
    buckets: AHashMap<Trigram, Vec<usize>>,
    text_chars: usize,
    total_postings: usize,
}

impl TrigramIndex {
    pub fn build(text: &[char]) -> Self {
        if text.is_empty() {
            debug!("Empty reference text, trigram index left empty");
            return Self::default();
        }

        let grams = TrigramGenerator::new().generate(text);
        let mut buckets: AHashMap<Trigram, Vec<usize>> = AHashMap::with_capacity(grams.len());
        let total_postings = grams.len();
        for (offset, key) in grams {
            buckets.entry(key).or_default().push(offset);
        }

        let index = Self {
            buckets,
            text_chars: text.len(),
            total_postings,
        };
        let stats = index.stats();
        info!(
            "Built trigram index: {} chars, {} distinct trigrams, {} postings",
            stats.text_chars, stats.distinct_trigrams, stats.total_postings
        );
        index
    }

    /// All offsets where `key` occurs, in ascending order.
    pub fn occurrences(&self, key: &Trigram) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct trigrams.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_postings(&self) -> usize {
        self.total_postings
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            text_chars: self.text_chars,
            distinct_trigrams: self.buckets.len(),
            total_postings: self.total_postings,
        }
    }
}
