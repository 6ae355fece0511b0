//! Beam selection: choose the next frontier from an iteration's candidates

use crate::search::node::{Node, sort_by_score};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Keep the `beam_width` best-scoring candidates.
///
/// The sort is stable, so equal scores keep discovery order. When a tie-break
/// RNG is supplied the candidates are shuffled first, which orders ties
/// pseudo-randomly but reproducibly for a given seed.
pub fn select_frontier<S>(
    mut candidates: Vec<Node<S>>,
    beam_width: usize,
    tie_break: Option<&mut ChaCha8Rng>,
) -> Vec<Node<S>> {
    if let Some(rng) = tie_break {
        candidates.shuffle(rng);
    }
    sort_by_score(&mut candidates);
    candidates.truncate(beam_width);
    candidates
}
