//! 2×2 integer matrices up to scalars from a fixed prime set
//!
//! Generators live in GL₂(ℤ[1/S]) for a finite prime set S. Matrices are kept
//! integral and primitive: after every product, each prime of S dividing all
//! four entries is divided out. Two matrices then agree projectively exactly
//! when they are equal (or, with sign-projective keys, equal up to sign).
//!
//! Score is `ln |det|`. Since the generators' determinants are products of
//! primes in S, a primitive matrix has `|det| = 1` exactly when the word is a
//! scalar multiple of an element of SL₂(ℤ), which is the search target.

use crate::problems::{
    Exact, ProblemError, check_alphabet, format_factorization, log_abs, prime_factors, primitize,
    sign_normalize,
};
use crate::search::node::Node;
use crate::search::problem::SearchProblem;
use crate::search::word::{Alphabet, Letter, Word};
use std::fmt;
use std::sync::Arc;

/// Relations up to this reduced length with `|trace| <= 2` are not reported
pub const DEFAULT_TRIVIAL_LEN: usize = 10;

/// A 2×2 integer matrix `[[a, b], [c, d]]`, entries in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mat2 {
    pub entries: [i128; 4],
}

impl Mat2 {
    pub const fn new(a: i128, b: i128, c: i128, d: i128) -> Self {
        Self {
            entries: [a, b, c, d],
        }
    }

    pub const fn identity() -> Self {
        Self::new(1, 0, 0, 1)
    }

    /// `self * other`, or `None` if any entry overflows
    pub fn checked_mul(&self, other: &Mat2) -> Option<Mat2> {
        let [a, b, c, d] = self.entries;
        let [e, f, g, h] = other.entries;
        let dot = |x: i128, y: i128, z: i128, w: i128| x.checked_mul(y)?.checked_add(z.checked_mul(w)?);
        Some(Mat2::new(
            dot(a, e, b, g)?,
            dot(a, f, b, h)?,
            dot(c, e, d, g)?,
            dot(c, f, d, h)?,
        ))
    }

    pub fn checked_det(&self) -> Option<i128> {
        let [a, b, c, d] = self.entries;
        a.checked_mul(d)?.checked_sub(b.checked_mul(c)?)
    }

    pub fn checked_trace(&self) -> Option<i128> {
        self.entries[0].checked_add(self.entries[3])
    }

    /// Adjugate `[[d, -b], [-c, a]]`, the inverse up to the scalar `det`
    pub fn checked_adjugate(&self) -> Option<Mat2> {
        let [a, b, c, d] = self.entries;
        Some(Mat2::new(d, b.checked_neg()?, c.checked_neg()?, a))
    }

    /// True for `λ·I`
    pub fn is_scalar(&self) -> bool {
        let [a, b, c, d] = self.entries;
        b == 0 && c == 0 && a == d
    }
}

impl fmt::Display for Mat2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.entries;
        write!(f, "[[{}, {}], [{}, {}]]", a, b, c, d)
    }
}

/// A primitive matrix with its determinant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixState {
    pub matrix: Mat2,
    pub det: i128,
}

/// Relation search among 2×2 integer matrices over ℤ[1/S]
#[derive(Debug, Clone)]
pub struct MatrixProblem {
    name: String,
    alphabet: Arc<Alphabet>,
    /// Generator matrix per letter, already primitive
    generators: Vec<Exact<MatrixState>>,
    primes: Vec<i128>,
    sign_projective: bool,
    trivial_len: usize,
    forbidden: Vec<Vec<Letter>>,
}

impl MatrixProblem {
    /// Build a problem with one matrix per alphabet letter, in letter order.
    ///
    /// `primes` is the set S of primes that may be divided out of products.
    pub fn new(
        name: &str,
        alphabet: Alphabet,
        matrices: Vec<Mat2>,
        primes: Vec<i128>,
    ) -> Result<Self, ProblemError> {
        if alphabet.len() != matrices.len() {
            return Err(ProblemError::GeneratorMismatch {
                letters: alphabet.len(),
                generators: matrices.len(),
            });
        }
        if matrices.is_empty() {
            return Err(ProblemError::InvalidParameter(
                "at least one generator is required".to_string(),
            ));
        }
        if let Some(bad) = primes.iter().find(|&&p| p < 2) {
            return Err(ProblemError::InvalidParameter(format!(
                "prime set may only contain integers >= 2, got {}",
                bad
            )));
        }

        let mut problem = Self {
            name: name.to_string(),
            alphabet: Arc::new(alphabet),
            generators: Vec::new(),
            primes,
            sign_projective: false,
            trivial_len: DEFAULT_TRIVIAL_LEN,
            forbidden: Vec::new(),
        };
        problem.generators = matrices.iter().map(|m| problem.normalize(*m)).collect();
        Ok(problem)
    }

    /// The Long–Reid family with parameter `t`.
    ///
    /// `a = [[t, 0], [0, 1]]`, `b = [[1 + t², 2], [t, 1]]`, with inverses
    /// `ai` and `bi` given by adjugates. S is the set of primes dividing
    /// `t(t - 1)`, which covers both determinants (`det a = t`,
    /// `det b = (t - 1)²`).
    pub fn long_reid(t: i128) -> Result<Self, ProblemError> {
        if t < 2 {
            return Err(ProblemError::InvalidParameter(format!(
                "Long-Reid parameter must be at least 2, got {}",
                t
            )));
        }
        let overflow =
            || ProblemError::InvalidParameter(format!("Long-Reid parameter {} is too large", t));

        let a = Mat2::new(t, 0, 0, 1);
        let t_squared = t.checked_mul(t).ok_or_else(overflow)?;
        let b = Mat2::new(t_squared.checked_add(1).ok_or_else(overflow)?, 2, t, 1);
        let ai = a.checked_adjugate().ok_or_else(overflow)?;
        let bi = b.checked_adjugate().ok_or_else(overflow)?;

        let product = t.checked_mul(t - 1).ok_or_else(overflow)?;
        let primes = prime_factors(product.unsigned_abs());

        let alphabet = Alphabet::from_inverse_pairs(&[("a", "ai"), ("b", "bi")], " . ");
        Self::new(
            &format!("Long-Reid(t={})", t),
            alphabet,
            vec![a, ai, b, bi],
            primes,
        )
    }

    /// Identify `M` with `-M` in canonical keys
    pub fn with_sign_projective(mut self, enabled: bool) -> Self {
        self.sign_projective = enabled;
        self.generators = self
            .generators
            .iter()
            .map(|g| match g {
                Exact::Value(state) => self.normalize(state.matrix),
                Exact::Overflow => Exact::Overflow,
            })
            .collect();
        self
    }

    /// Reject solutions with `|trace| <= 2` whose reduced word has at most `len` letters
    pub fn with_trivial_len(mut self, len: usize) -> Self {
        self.trivial_len = len;
        self
    }

    /// Score words containing `subword` as `+inf` and never report them
    pub fn with_forbidden_subword(mut self, subword: &str) -> Result<Self, ProblemError> {
        let word = self.parse_word(subword)?;
        if word.is_empty() {
            return Err(ProblemError::InvalidWord(
                "forbidden subword must not be empty".to_string(),
            ));
        }
        self.forbidden.push(word.letters().to_vec());
        Ok(self)
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn primes(&self) -> &[i128] {
        &self.primes
    }

    /// Generator matrix for a letter
    pub fn generator(&self, letter: Letter) -> Option<Mat2> {
        self.generators
            .get(letter as usize)
            .and_then(Exact::value)
            .map(|state| state.matrix)
    }

    pub fn parse_word(&self, text: &str) -> Result<Word, ProblemError> {
        Word::parse(&self.alphabet, text).map_err(ProblemError::InvalidWord)
    }

    /// Multiply out a word from the identity, normalizing after every step.
    ///
    /// Fails if the word is not over this problem's alphabet.
    pub fn evaluate(&self, word: &Word) -> Result<Exact<MatrixState>, ProblemError> {
        check_alphabet(&self.alphabet, word)?;
        let mut current = self.normalize(Mat2::identity());
        for &letter in word.letters() {
            let generator = self.generators.get(letter as usize).ok_or_else(|| {
                ProblemError::InvalidWord(format!("no generator for letter {}", letter))
            })?;
            current = self.multiply(&current, generator);
        }
        Ok(current)
    }

    fn normalize(&self, mut matrix: Mat2) -> Exact<MatrixState> {
        primitize(&mut matrix.entries, &self.primes);
        if self.sign_projective && sign_normalize(&mut matrix.entries).is_none() {
            return Exact::Overflow;
        }
        matrix
            .checked_det()
            .map(|det| MatrixState { matrix, det })
            .into()
    }

    fn multiply(&self, a: &Exact<MatrixState>, b: &Exact<MatrixState>) -> Exact<MatrixState> {
        match (a, b) {
            (Exact::Value(a), Exact::Value(b)) => match a.matrix.checked_mul(&b.matrix) {
                Some(product) => self.normalize(product),
                None => Exact::Overflow,
            },
            _ => Exact::Overflow,
        }
    }

    fn is_forbidden(&self, word: &Word) -> bool {
        self.forbidden
            .iter()
            .any(|pattern| word.contains_subword(pattern))
    }

    fn score(&self, state: &Exact<MatrixState>, word: &Word) -> f64 {
        match state {
            Exact::Value(state) if !self.is_forbidden(word) => log_abs(state.det),
            _ => f64::INFINITY,
        }
    }

    fn node(&self, state: Exact<MatrixState>, word: Word) -> Node<Exact<MatrixState>> {
        let score = self.score(&state, &word);
        Node::new(state, word, score)
    }
}

impl SearchProblem for MatrixProblem {
    type State = Exact<MatrixState>;
    type Key = Option<[i128; 4]>;

    fn initial_node(&self) -> Node<Self::State> {
        Node::new(
            self.normalize(Mat2::identity()),
            Word::empty(&self.alphabet),
            f64::INFINITY,
        )
    }

    fn generator_nodes(&self) -> Vec<Node<Self::State>> {
        self.alphabet
            .letters()
            .zip(self.generators.iter())
            .map(|(letter, state)| self.node(*state, Word::letter(&self.alphabet, letter)))
            .collect()
    }

    fn combine(&self, a: &Node<Self::State>, b: &Node<Self::State>) -> Node<Self::State> {
        self.node(
            self.multiply(&a.state, &b.state),
            a.word.concat_reduced(&b.word),
        )
    }

    fn canonical_key(&self, node: &Node<Self::State>) -> Self::Key {
        node.state.value().map(|state| state.matrix.entries)
    }

    fn is_solution(&self, node: &Node<Self::State>) -> bool {
        node.state
            .value()
            .is_some_and(|state| state.det.unsigned_abs() == 1)
    }

    fn is_nontrivial(&self, node: &Node<Self::State>) -> bool {
        let state = match node.state.value() {
            Some(state) => state,
            None => return false,
        };
        if self.is_forbidden(&node.word) {
            return false;
        }
        match state.matrix.checked_trace() {
            Some(trace) if trace.unsigned_abs() > 2 => true,
            _ => node.word.reduced().len() > self.trivial_len,
        }
    }

    fn format_score(&self, node: &Node<Self::State>) -> String {
        match node.state.value() {
            Some(state) => format_factorization(state.det.unsigned_abs(), &self.primes),
            None => "overflow".to_string(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
