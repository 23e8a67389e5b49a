pub mod algorithms;
pub mod similarity;
pub mod types;
pub mod search;
pub mod parallel;

// Re-export the main types
pub use self::algorithms::SmithWaterman;
pub use self::similarity::{SimilarityModel, SimilarityTable};
pub use self::search::FuzzySearch;
pub use self::parallel::ParallelSearcher;
pub use self::types::{
    Alignment,
    CandidateWindow,
    MatchResult,
    SimpleMatchResult,
};
