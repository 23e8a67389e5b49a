pub mod generator;
pub mod index;
pub mod types;

pub use self::generator::{NGramGenerator, TrigramGenerator};
pub use self::index::TrigramIndex;
pub use self::types::{IndexStats, Trigram};
