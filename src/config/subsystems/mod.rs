pub mod matcher;
pub mod processor;

pub use matcher::{MatcherConfig, ScoringConfig};
pub use processor::ProcessorConfig;
