use log::trace;

use crate::config::subsystems::matcher::ScoringConfig;
use crate::error::{Error, Result};
use crate::types::{CharPair, Score, SubstitutionCounts};
use super::similarity::SimilarityModel;
use super::types::Alignment;

/// Row-major dynamic-programming grid of `(rows) x (cols)` scores.
#[derive(Debug, Clone)]
pub struct ScoreGrid {
    cells: Vec<Score>,
    cols: usize,
}

impl ScoreGrid {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![0; rows * cols],
            cols,
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Score {
        self.cells[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, score: Score) {
        self.cells[i * self.cols + j] = score;
    }
}

/// Filled grid plus the first cell holding the global maximum.
#[derive(Debug, Clone)]
pub struct FilledGrid {
    pub grid: ScoreGrid,
    pub end_i: usize,
    pub end_j: usize,
    pub max_score: Score,
}

/// Smith–Waterman local alignment of a query against a window of text.
///
/// Row 0 and column 0 carry cumulative gap penalties instead of zeros, so an
/// alignment's first pair always lands on a clamped cell unless it starts in
/// the window's first column. Traceback accounts for that when it reports
/// where the match starts.
#[derive(Debug, Clone, Copy)]
pub struct SmithWaterman<'a> {
    similarity: &'a SimilarityModel,
    delete_score: Score,
    insert_score: Score,
}

impl<'a> SmithWaterman<'a> {
    pub fn new(similarity: &'a SimilarityModel, scoring: &ScoringConfig) -> Self {
        Self {
            similarity,
            delete_score: scoring.delete_score,
            insert_score: scoring.insert_score,
        }
    }

    pub fn align(&self, query: &[char], window: &[char]) -> Result<Alignment> {
        let filled = self.fill(query, window);
        let alignment = self.traceback(query, window, &filled)?;
        trace!(
            "Aligned {} query chars against {} window chars: start {}, length {}, score {}",
            query.len(), window.len(), alignment.relative_start, alignment.match_length, alignment.score
        );
        Ok(alignment)
    }

    pub fn fill(&self, query: &[char], window: &[char]) -> FilledGrid {
        let (n, m) = (query.len(), window.len());
        let mut grid = ScoreGrid::new(n + 1, m + 1);

        for i in 1..=n {
            grid.set(i, 0, self.insert_score * i as Score);
        }
        for j in 1..=m {
            grid.set(0, j, self.delete_score * j as Score);
        }

        let mut max_score: Score = 0;
        let (mut end_i, mut end_j) = (0, 0);
        for i in 1..=n {
            let query_char = query[i - 1];
            for j in 1..=m {
                let matched = grid.get(i - 1, j - 1) + self.similarity.similarity(query_char, window[j - 1]);
                let inserted = grid.get(i, j - 1) + self.insert_score;
                let deleted = grid.get(i - 1, j) + self.delete_score;
                let score = matched.max(inserted).max(deleted).max(0);
                grid.set(i, j, score);
                if score > max_score {
                    max_score = score;
                    end_i = i;
                    end_j = j;
                }
            }
        }

        FilledGrid { grid, end_i, end_j, max_score }
    }

    /// Walks back from the maximum cell, preferring diagonal, then vertical,
    /// then horizontal moves, until a zero cell or the boundary is reached.
    pub fn traceback(&self, query: &[char], window: &[char], filled: &FilledGrid) -> Result<Alignment> {
        let grid = &filled.grid;
        let mut substitutions = SubstitutionCounts::new();
        let (mut i, mut j) = (filled.end_i, filled.end_j);

        while i > 0 && j > 0 && grid.get(i, j) != 0 {
            let score = grid.get(i, j);
            let (query_char, window_char) = (query[i - 1], window[j - 1]);

            if score == grid.get(i - 1, j - 1) + self.similarity.similarity(query_char, window_char) {
                if query_char != window_char {
                    *substitutions.entry(CharPair::new(query_char, window_char)).or_insert(0) += 1;
                }
                i -= 1;
                j -= 1;
            } else if score == grid.get(i - 1, j) + self.delete_score {
                i -= 1;
            } else if score == grid.get(i, j - 1) + self.insert_score {
                j -= 1;
            } else {
                return Err(Error::alignment(format!(
                    "Smith-Waterman traceback failure: cell ({}, {}) with score {} matches no move",
                    i, j, score
                )));
            }
        }

        // A zero interior cell is the clamped leading pair of the alignment.
        let relative_start = if i > 0 && j > 0 { j - 1 } else { j };

        Ok(Alignment {
            relative_start,
            match_length: filled.end_j - relative_start,
            score: filled.max_score,
            substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn align_with(scoring: &ScoringConfig, query: &str, window: &str) -> Alignment {
        let model = SimilarityModel::new(scoring);
        SmithWaterman::new(&model, scoring)
            .align(&chars(query), &chars(window))
            .unwrap()
    }

    fn align(query: &str, window: &str) -> Alignment {
        align_with(&ScoringConfig::default(), query, window)
    }

    fn covered(window: &str, alignment: &Alignment) -> String {
        window.chars()
            .skip(alignment.relative_start)
            .take(alignment.match_length)
            .collect()
    }

    #[test]
    fn test_boundary_is_gap_penalized() {
        let scoring = ScoringConfig::default();
        let model = SimilarityModel::new(&scoring);
        let filled = SmithWaterman::new(&model, &scoring).fill(&chars("ab"), &chars("xyz"));
        assert_eq!(filled.grid.get(0, 0), 0);
        assert_eq!(filled.grid.get(0, 3), -12);
        assert_eq!(filled.grid.get(2, 0), -8);
    }

    #[test]
    fn test_identical_sequences() {
        let alignment = align("abcdef", "abcdef");
        assert_eq!(alignment.relative_start, 0);
        assert_eq!(alignment.match_length, 6);
        assert_eq!(alignment.score, 18);
        assert!(alignment.substitutions.is_empty());
    }

    #[test]
    fn test_interior_match_first_pair_is_absorbed() {
        let alignment = align("brown", "the brown fox");
        assert_eq!(covered("the brown fox", &alignment), "brown");
        assert_eq!(alignment.relative_start, 4);
        // The first pair sits next to the penalized boundary and scores nothing
        assert_eq!(alignment.score, 12);
    }

    #[test]
    fn test_substitution_is_counted() {
        let alignment = align("brawn", "the brown fox");
        assert_eq!(covered("the brown fox", &alignment), "brown");
        assert_eq!(alignment.score, 9);
        assert_eq!(alignment.substitutions.len(), 1);
        assert_eq!(alignment.substitutions.get(&CharPair::new('a', 'o')), Some(&1));
    }

    #[test]
    fn test_gap_in_query() {
        let window = "the quick brown fox j";
        let alignment = align("quick brwn fox", window);
        assert_eq!(covered(window, &alignment), "quick brown fox");
        assert_eq!(alignment.score, 35);
        assert!(alignment.substitutions.is_empty());
    }

    #[test]
    fn test_no_alignment() {
        let alignment = align("xyz", "abc");
        assert_eq!(alignment.score, 0);
        assert_eq!(alignment.match_length, 0);
        assert!(!alignment.is_match());

        let empty = align("", "abc");
        assert_eq!(empty.score, 0);
        assert_eq!(empty.match_length, 0);
    }

    #[test]
    fn test_similarity_overrides_change_scores() {
        let scoring = ScoringConfig::default();
        let table = SimilarityModel::table_from_pairs([("ao", 2)]).unwrap();
        let model = SimilarityModel::new(&scoring).with_table(table);
        let alignment = SmithWaterman::new(&model, &scoring)
            .align(&chars("brawn"), &chars("the brown fox"))
            .unwrap();
        assert_eq!(alignment.score, 11);
        assert_eq!(alignment.substitutions.get(&CharPair::new('a', 'o')), Some(&1));
    }

    #[test]
    fn test_substitutions_bounded_by_shorter_sequence() {
        let cases = [
            ("kitten", "sitting on the mat"),
            ("abababab", "babababa"),
            ("the lazy dog", "a lazy cat"),
            ("qqqq", "q"),
        ];
        let scoring = ScoringConfig { mismatch_score: 1, ..ScoringConfig::default() };
        for (query, window) in cases {
            let alignment = align_with(&scoring, query, window);
            let total: usize = alignment.substitutions.values().sum();
            assert!(total <= query.chars().count().min(window.chars().count()));
        }
    }

    #[test]
    fn test_corrupted_grid_is_an_internal_fault() {
        let scoring = ScoringConfig::default();
        let model = SimilarityModel::new(&scoring);
        let aligner = SmithWaterman::new(&model, &scoring);
        let (query, window) = (chars("abcd"), chars("abcd"));
        let mut filled = aligner.fill(&query, &window);
        filled.grid.set(2, 2, 1000);

        let err = aligner.traceback(&query, &window, &filled).unwrap_err();
        assert!(err.is_internal_fault());
    }
}
