use std::collections::BTreeMap;
use std::fmt;

/// Alignment scores. Accumulated by addition only; higher is better.
pub type Score = i64;

/// Score reported when no candidate window was aligned at all.
pub const NO_MATCH_SCORE: Score = -10_000_000_000;

/// Substitution counts observed along an optimal traceback, keyed by pair.
pub type SubstitutionCounts = BTreeMap<CharPair, usize>;

/// An unordered pair of characters, stored smaller-first so that `(a, b)`
/// and `(b, a)` are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharPair(char, char);

impl CharPair {
    pub fn new(a: char, b: char) -> Self {
        if a > b {
            CharPair(b, a)
        } else {
            CharPair(a, b)
        }
    }

    /// Parses a two-character key such as `"ae"`. Any other length is rejected.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => Some(Self::new(a, b)),
            _ => None,
        }
    }

    pub fn first(&self) -> char {
        self.0
    }

    pub fn second(&self) -> char {
        self.1
    }

    pub fn is_identity(&self) -> bool {
        self.0 == self.1
    }
}

impl fmt::Display for CharPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

/// A half-open span `[start, end)` of character offsets over a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange<'a> {
    text: &'a [char],
    start: usize,
    end: usize,
}

impl<'a> TextRange<'a> {
    /// Builds a range, clamping both ends into the text so the invariant
    /// `start <= end <= text.len()` always holds.
    pub fn new(text: &'a [char], start: usize, end: usize) -> Self {
        let end = end.min(text.len());
        let start = start.min(end);
        Self { text, start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The full text this range points into.
    pub fn source(&self) -> &'a [char] {
        self.text
    }

    pub fn chars(&self) -> &'a [char] {
        &self.text[self.start..self.end]
    }

    /// The covered text as an owned string.
    pub fn text(&self) -> String {
        self.chars().iter().collect()
    }
}

impl fmt::Display for TextRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
