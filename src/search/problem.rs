//! The contract between the search engine and a domain problem

use crate::search::node::Node;
use std::hash::Hash;

/// A domain-specific search problem.
///
/// The engine only ever talks to the domain through these operations. It never
/// inspects a state, never reorders the operands of [`combine`](Self::combine),
/// and treats [`Key`](Self::Key) as an opaque equivalence.
///
/// Implementations must be pure: `combine` and `canonical_key` may be called
/// from several threads at once during parallel expansion.
pub trait SearchProblem: Sync {
    /// The composed group element (matrix, quaternion, residue, ...)
    type State: Clone + Send + Sync;
    /// Fingerprint of a state up to the equivalences the domain identifies
    type Key: Hash + Eq + Clone + Send + Sync;

    /// The identity/root node.
    ///
    /// Its score should be a "no match" sentinel; the root is never reported
    /// as a solution.
    fn initial_node(&self) -> Node<Self::State>;

    /// The fixed alphabet of moves, conventionally including inverses.
    ///
    /// Must be non-empty and every score must be non-NaN.
    fn generator_nodes(&self) -> Vec<Node<Self::State>>;

    /// Compose `a` followed by `b`, building the child's word and scoring it from scratch
    fn combine(&self, a: &Node<Self::State>, b: &Node<Self::State>) -> Node<Self::State>;

    /// Canonical key used for deduplication
    fn canonical_key(&self, node: &Node<Self::State>) -> Self::Key;

    /// Target predicate
    fn is_solution(&self, node: &Node<Self::State>) -> bool;

    /// Secondary filter applied only to solutions, rejecting known-trivial relations
    fn is_nontrivial(&self, node: &Node<Self::State>) -> bool;

    /// Cosmetic score rendering for progress output
    fn format_score(&self, node: &Node<Self::State>) -> String {
        format!("{:.4}", node.score)
    }

    /// Short name used in log output
    fn name(&self) -> &str {
        "problem"
    }
}

/// Lets several engines borrow one problem (see the portfolio runner)
impl<P: SearchProblem + ?Sized> SearchProblem for &P {
    type State = P::State;
    type Key = P::Key;

    fn initial_node(&self) -> Node<Self::State> {
        (**self).initial_node()
    }

    fn generator_nodes(&self) -> Vec<Node<Self::State>> {
        (**self).generator_nodes()
    }

    fn combine(&self, a: &Node<Self::State>, b: &Node<Self::State>) -> Node<Self::State> {
        (**self).combine(a, b)
    }

    fn canonical_key(&self, node: &Node<Self::State>) -> Self::Key {
        (**self).canonical_key(node)
    }

    fn is_solution(&self, node: &Node<Self::State>) -> bool {
        (**self).is_solution(node)
    }

    fn is_nontrivial(&self, node: &Node<Self::State>) -> bool {
        (**self).is_nontrivial(node)
    }

    fn format_score(&self, node: &Node<Self::State>) -> String {
        (**self).format_score(node)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
