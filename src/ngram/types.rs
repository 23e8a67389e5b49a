use serde::{Serialize, Deserialize};

/// Key of the trigram index: three consecutive characters of the padded text.
pub type Trigram = [char; 3];

/// Summary of a built index, logged after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub text_chars: usize,
    pub distinct_trigrams: usize,
    pub total_postings: usize,
}
