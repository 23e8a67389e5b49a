//! nazir finds the best approximate occurrence of a short query inside a long
//! reference text. A trigram index narrows the text down to a few candidate
//! windows, and Smith–Waterman local alignment picks the exact span, its
//! score, and the character substitutions along the way.

// Module declarations
pub mod error;
pub mod ngram;
pub mod matcher;
pub mod config;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use matcher::{FuzzySearch, ParallelSearcher, SimilarityModel};
pub use types::{CharPair, Score, TextRange, NO_MATCH_SCORE};

// Re-export the config from config module
pub use config::{ConfigIssue, NazirConfig};
