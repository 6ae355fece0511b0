//! The persistent flash pool
//!
//! The flash pool holds the best nodes seen so far (excluding zero-score
//! nodes) and is used alongside the fixed generators as the right-hand operand
//! of every combination. Because a flash node's word can be arbitrarily long,
//! combining with it takes a multi-letter "macro" step in a single iteration.

use crate::search::node::{Node, sort_by_score};
use crate::search::problem::SearchProblem;
use std::collections::HashSet;

/// Bounded set of best-ever nodes, refreshed once per iteration
#[derive(Debug, Clone)]
pub struct FlashPool<S> {
    nodes: Vec<Node<S>>,
    capacity: usize,
}

impl<S: Clone> FlashPool<S> {
    /// Start with the generators as the macro pool.
    ///
    /// The seed is not truncated; the first refresh brings the pool within `capacity`.
    pub fn seeded(generators: &[Node<S>], capacity: usize) -> Self {
        Self {
            nodes: generators.to_vec(),
            capacity,
        }
    }

    pub fn nodes(&self) -> &[Node<S>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Right-hand operands for this iteration: flash entries first, then
    /// generators, with later duplicates (by canonical key) dropped.
    pub fn expansion_pool<P>(&self, generators: &[Node<S>], problem: &P) -> Vec<Node<S>>
    where
        P: SearchProblem<State = S>,
    {
        let mut seen = HashSet::with_capacity(self.nodes.len() + generators.len());
        self.nodes
            .iter()
            .chain(generators.iter())
            .filter(|node| seen.insert(problem.canonical_key(node)))
            .cloned()
            .collect()
    }

    /// Merge the new frontier into the pool.
    ///
    /// Zero-score nodes are dropped. The rest are sorted by score, only the best
    /// node per canonical key is kept, and the pool is truncated to capacity.
    pub fn refresh<P>(&mut self, frontier: &[Node<S>], problem: &P)
    where
        P: SearchProblem<State = S>,
    {
        let mut merged: Vec<Node<S>> = self
            .nodes
            .drain(..)
            .chain(frontier.iter().cloned())
            .filter(|node| !node.has_zero_score())
            .collect();
        sort_by_score(&mut merged);

        let mut seen = HashSet::with_capacity(merged.len());
        self.nodes = merged
            .into_iter()
            .filter(|node| seen.insert(problem.canonical_key(node)))
            .take(self.capacity)
            .collect();
    }

    /// Identifiers of the best `n` entries, for progress output
    pub fn preview(&self, n: usize) -> Vec<String> {
        self.nodes.iter().take(n).map(Node::identifier).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::word::{Alphabet, Word};
    use std::sync::Arc;

    /// Integers mod 10 under addition, keyed by residue
    struct Residues {
        alphabet: Arc<Alphabet>,
    }

    impl Residues {
        fn new() -> Self {
            Self {
                alphabet: Arc::new(Alphabet::new(".").with_letter("x").with_letter("y")),
            }
        }

        fn node(&self, residue: u32, score: f64, letters: Vec<u16>) -> Node<u32> {
            Node::new(residue, Word::from_letters(&self.alphabet, letters), score)
        }
    }

    impl SearchProblem for Residues {
        type State = u32;
        type Key = u32;

        fn initial_node(&self) -> Node<u32> {
            self.node(0, f64::INFINITY, vec![])
        }

        fn generator_nodes(&self) -> Vec<Node<u32>> {
            vec![self.node(1, 1.0, vec![0]), self.node(3, 3.0, vec![1])]
        }

        fn combine(&self, a: &Node<u32>, b: &Node<u32>) -> Node<u32> {
            let residue = (a.state + b.state) % 10;
            Node::new(residue, a.word.concat(&b.word), residue as f64)
        }

        fn canonical_key(&self, node: &Node<u32>) -> u32 {
            node.state
        }

        fn is_solution(&self, node: &Node<u32>) -> bool {
            node.state == 0
        }

        fn is_nontrivial(&self, _node: &Node<u32>) -> bool {
            true
        }
    }

    #[test]
    fn test_expansion_pool_prefers_flash_and_dedupes() {
        let problem = Residues::new();
        let generators = problem.generator_nodes();
        let flash_node = problem.node(1, 1.0, vec![1, 1, 1, 1, 1, 1, 1]);
        let mut pool = FlashPool::seeded(&[], 4);
        pool.refresh(&[flash_node], &problem);

        let expansion = pool.expansion_pool(&generators, &problem);
        assert_eq!(expansion.len(), 2);
        // Residue 1 comes from the flash entry, not the generator
        assert_eq!(expansion[0].word_len(), 7);
        assert_eq!(expansion[1].state, 3);
    }

    #[test]
    fn test_refresh_drops_zero_scores_and_truncates() {
        let problem = Residues::new();
        let mut pool = FlashPool::seeded(&problem.generator_nodes(), 2);
        assert_eq!(pool.len(), 2);

        let frontier = vec![
            problem.node(0, 0.0, vec![0, 1]),
            problem.node(2, 2.0, vec![0, 0]),
            problem.node(5, 5.0, vec![1, 0, 0]),
        ];
        pool.refresh(&frontier, &problem);

        let states: Vec<_> = pool.nodes().iter().map(|n| n.state).collect();
        assert_eq!(states, vec![1, 2]);
        assert!(pool.len() <= pool.capacity());
    }

    #[test]
    fn test_refresh_keeps_best_representative_per_key() {
        let problem = Residues::new();
        let mut pool = FlashPool::seeded(&[], 10);
        let frontier = vec![
            problem.node(4, 9.0, vec![0, 0, 0, 0]),
            problem.node(4, 4.0, vec![1, 0]),
        ];
        pool.refresh(&frontier, &problem);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.nodes()[0].score, 4.0);
        assert_eq!(pool.preview(5), vec!["y.x".to_string()]);
    }

    #[test]
    fn test_zero_capacity_pool_is_empty_after_refresh() {
        let problem = Residues::new();
        let mut pool = FlashPool::seeded(&problem.generator_nodes(), 0);
        pool.refresh(&[problem.node(2, 2.0, vec![0, 0])], &problem);
        assert!(pool.is_empty());
        assert_eq!(pool.expansion_pool(&problem.generator_nodes(), &problem).len(), 2);
    }
}
