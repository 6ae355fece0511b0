//! Search nodes and score ordering

use crate::search::word::Word;
use std::cmp::Ordering;

/// Scores below this magnitude count as zero (already at a trivial/solved state)
pub const ZERO_SCORE_EPSILON: f64 = 1e-10;

/// A labelled state: the algebraic object, the word that produced it, and its score.
///
/// Lower scores are closer to a solution. `+inf` and NaN mark degenerate states
/// and always sort last.
#[derive(Debug, Clone)]
pub struct Node<S> {
    pub state: S,
    pub word: Word,
    pub score: f64,
}

impl<S> Node<S> {
    pub fn new(state: S, word: Word, score: f64) -> Self {
        Self { state, word, score }
    }

    /// Human-readable identifier (the word written with the alphabet's labels)
    pub fn identifier(&self) -> String {
        self.word.to_string()
    }

    /// Number of letters in the word
    pub fn word_len(&self) -> usize {
        self.word.len()
    }

    pub fn is_root(&self) -> bool {
        self.word.is_empty()
    }

    /// True for infinite or NaN scores
    pub fn is_degenerate(&self) -> bool {
        !self.score.is_finite()
    }

    /// True if the score is indistinguishable from zero
    pub fn has_zero_score(&self) -> bool {
        self.score.abs() < ZERO_SCORE_EPSILON
    }
}

/// Total order on scores, ascending, with NaN after every other value.
pub fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Stable ascending sort by score
pub fn sort_by_score<S>(nodes: &mut [Node<S>]) {
    nodes.sort_by(|a, b| compare_scores(a.score, b.score));
}
