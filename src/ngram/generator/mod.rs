// src/ngram/generator/mod.rs

mod char_ngrams;

pub use self::char_ngrams::{NGramGenerator, TrigramGenerator, PAD_CHAR};
