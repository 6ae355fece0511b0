//! The cyclic group ℤ/n with generators `+1` and `-1`

use crate::problems::ProblemError;
use crate::search::node::Node;
use crate::search::problem::SearchProblem;
use crate::search::word::{Alphabet, Word};
use std::sync::Arc;

/// A residue together with the integer exponent sum (lift) that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CyclicState {
    pub residue: u64,
    pub lift: i64,
}

/// Relations in ℤ/n.
///
/// Words are concatenated without reduction and keyed by (residue, length),
/// so `+1.-1` is a distinct node from the root. A solution is any word
/// landing on residue 0; it is non-trivial when its lift is non-zero (the
/// word does not cancel in ℤ) and it is longer than `trivial_len`.
#[derive(Debug, Clone)]
pub struct CyclicProblem {
    modulus: u64,
    alphabet: Arc<Alphabet>,
    trivial_len: usize,
    name: String,
}

impl CyclicProblem {
    pub fn new(modulus: u64) -> Result<Self, ProblemError> {
        if modulus < 2 {
            return Err(ProblemError::InvalidParameter(format!(
                "modulus must be at least 2, got {}",
                modulus
            )));
        }
        Ok(Self {
            modulus,
            alphabet: Arc::new(Alphabet::from_inverse_pairs(&[("+1", "-1")], ".")),
            trivial_len: 0,
            name: format!("Z/{}", modulus),
        })
    }

    /// Reject solutions whose words are at most `len` letters long
    pub fn with_trivial_len(mut self, len: usize) -> Self {
        self.trivial_len = len;
        self
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Circular distance from `residue` to 0
    pub fn distance(&self, residue: u64) -> u64 {
        residue.min(self.modulus - residue)
    }

    fn node(&self, state: CyclicState, word: Word) -> Node<CyclicState> {
        let score = self.distance(state.residue) as f64;
        Node::new(state, word, score)
    }
}

impl SearchProblem for CyclicProblem {
    type State = CyclicState;
    type Key = (u64, usize);

    fn initial_node(&self) -> Node<CyclicState> {
        Node::new(
            CyclicState {
                residue: 0,
                lift: 0,
            },
            Word::empty(&self.alphabet),
            f64::INFINITY,
        )
    }

    fn generator_nodes(&self) -> Vec<Node<CyclicState>> {
        vec![
            self.node(
                CyclicState {
                    residue: 1,
                    lift: 1,
                },
                Word::letter(&self.alphabet, 0),
            ),
            self.node(
                CyclicState {
                    residue: self.modulus - 1,
                    lift: -1,
                },
                Word::letter(&self.alphabet, 1),
            ),
        ]
    }

    fn combine(&self, a: &Node<CyclicState>, b: &Node<CyclicState>) -> Node<CyclicState> {
        let sum = a.state.residue as u128 + b.state.residue as u128;
        let residue = (sum % self.modulus as u128) as u64;
        let state = CyclicState {
            residue,
            lift: a.state.lift.saturating_add(b.state.lift),
        };
        self.node(state, a.word.concat(&b.word))
    }

    fn canonical_key(&self, node: &Node<CyclicState>) -> (u64, usize) {
        (node.state.residue, node.word_len())
    }

    fn is_solution(&self, node: &Node<CyclicState>) -> bool {
        node.state.residue == 0
    }

    fn is_nontrivial(&self, node: &Node<CyclicState>) -> bool {
        node.state.lift != 0 && node.word_len() > self.trivial_len
    }

    fn format_score(&self, node: &Node<CyclicState>) -> String {
        format!("{} (lift {})", node.score, node.state.lift)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
