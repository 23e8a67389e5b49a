// src/ngram/generator/char_ngrams.rs

use log::trace;

/// Character placed once before and once after the text, so windows also
/// cover the first and last characters at a word-like boundary.
pub const PAD_CHAR: char = ' ';

/// Fixed-width character n-gram generator over a padded text.
///
/// The index and the query side must both go through the same generator;
/// any difference in padding or width silently degrades candidate voting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NGramGenerator<const N: usize>;

pub type TrigramGenerator = NGramGenerator<3>;

impl<const N: usize> NGramGenerator<N> {
    pub fn new() -> Self {
        Self
    }

    pub fn width(&self) -> usize {
        N
    }

    /// Returns `text` with a single `PAD_CHAR` on both ends.
    pub fn pad(&self, text: &[char]) -> Vec<char> {
        let mut padded = Vec::with_capacity(text.len() + 2);
        padded.push(PAD_CHAR);
        padded.extend_from_slice(text);
        padded.push(PAD_CHAR);
        padded
    }

    /// Every `N`-wide window of the padded text, stepping by one, paired with
    /// its start offset in the padded string.
    ///
    /// Offset `i` in the padded string is the index of the window's second
    /// character in the unpadded text, so offsets stay in `0..text.len()`.
    pub fn generate(&self, text: &[char]) -> Vec<(usize, [char; N])> {
        let padded = self.pad(text);
        if N == 0 || padded.len() < N {
            trace!("Text too short for {}-grams (padded length: {})", N, padded.len());
            return Vec::new();
        }

        let mut ngrams = Vec::with_capacity(padded.len() - N + 1);
        for (offset, window) in padded.windows(N).enumerate() {
            let mut key = [PAD_CHAR; N];
            key.copy_from_slice(window);
            ngrams.push((offset, key));
        }
        ngrams
    }
}
