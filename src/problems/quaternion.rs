//! Integer quaternions up to real scalars
//!
//! A unit quaternion `q / |q|` with `q` integral represents an element of
//! SU(2). Words are multiplied out exactly on the integral representatives,
//! dividing out primes from a fixed set and normalizing the sign, so two words
//! agree projectively exactly when their representatives are equal. A relation
//! is a word whose product is real.

use crate::problems::{
    Exact, ProblemError, check_alphabet, format_factorization, log_abs, primitize,
    sign_normalize,
};
use crate::search::node::Node;
use crate::search::problem::SearchProblem;
use crate::search::word::{Alphabet, Letter, Word};
use std::fmt;
use std::sync::Arc;

/// Relations up to this reduced length are not reported
pub const DEFAULT_TRIVIAL_LEN: usize = 8;

/// `w + x·i + y·j + z·k` with integer coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quaternion {
    pub w: i128,
    pub x: i128,
    pub y: i128,
    pub z: i128,
}

impl Quaternion {
    pub const fn new(w: i128, x: i128, y: i128, z: i128) -> Self {
        Self { w, x, y, z }
    }

    pub const fn one() -> Self {
        Self::new(1, 0, 0, 0)
    }

    /// Hamilton product `self * other`, or `None` on overflow
    pub fn checked_mul(&self, other: &Quaternion) -> Option<Quaternion> {
        let (a1, b1, c1, d1) = (self.w, self.x, self.y, self.z);
        let (a2, b2, c2, d2) = (other.w, other.x, other.y, other.z);
        let sum = |terms: [(i128, i128, i128); 4]| {
            terms.iter().try_fold(0i128, |acc, &(sign, p, q)| {
                acc.checked_add(sign.checked_mul(p.checked_mul(q)?)?)
            })
        };
        Some(Quaternion::new(
            sum([(1, a1, a2), (-1, b1, b2), (-1, c1, c2), (-1, d1, d2)])?,
            sum([(1, a1, b2), (1, b1, a2), (1, c1, d2), (-1, d1, c2)])?,
            sum([(1, a1, c2), (-1, b1, d2), (1, c1, a2), (1, d1, b2)])?,
            sum([(1, a1, d2), (1, b1, c2), (-1, c1, b2), (1, d1, a2)])?,
        ))
    }

    /// Conjugate `w - x·i - y·j - z·k`, the inverse up to the norm
    pub fn checked_conjugate(&self) -> Option<Quaternion> {
        Some(Quaternion::new(
            self.w,
            self.x.checked_neg()?,
            self.y.checked_neg()?,
            self.z.checked_neg()?,
        ))
    }

    /// `w² + x² + y² + z²`
    pub fn checked_norm(&self) -> Option<i128> {
        [self.w, self.x, self.y, self.z]
            .iter()
            .try_fold(0i128, |acc, &c| acc.checked_add(c.checked_mul(c)?))
    }

    /// True if the imaginary part vanishes
    pub fn is_real(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }

    fn to_array(self) -> [i128; 4] {
        [self.w, self.x, self.y, self.z]
    }

    fn from_array([w, x, y, z]: [i128; 4]) -> Self {
        Self::new(w, x, y, z)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i + {}j + {}k", self.w, self.x, self.y, self.z)
    }
}

/// A normalized quaternion and its norm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuaternionState {
    pub quaternion: Quaternion,
    pub norm: i128,
}

/// Relation search among integer quaternions
#[derive(Debug, Clone)]
pub struct QuaternionProblem {
    name: String,
    alphabet: Arc<Alphabet>,
    generators: Vec<Exact<QuaternionState>>,
    primes: Vec<i128>,
    trivial_len: usize,
    forbidden: Vec<Vec<Letter>>,
}

impl QuaternionProblem {
    /// Build a problem from `(label, quaternion)` pairs.
    ///
    /// Each generator `g` gets an inverse letter labelled `<label>i` acting
    /// as the conjugate of `g`.
    pub fn new(
        name: &str,
        generators: &[(&str, Quaternion)],
        primes: Vec<i128>,
        separator: &str,
    ) -> Result<Self, ProblemError> {
        if generators.is_empty() {
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

        let inverse_labels: Vec<String> = generators
            .iter()
            .map(|(label, _)| format!("{}i", label))
            .collect();
        let alphabet = generators
            .iter()
            .zip(&inverse_labels)
            .fold(Alphabet::new(separator), |alphabet, ((label, _), inverse)| {
                alphabet.with_inverse_pair(label, inverse)
            });

        let mut problem = Self {
            name: name.to_string(),
            alphabet: Arc::new(alphabet),
            generators: Vec::with_capacity(generators.len() * 2),
            primes,
            trivial_len: DEFAULT_TRIVIAL_LEN,
            forbidden: Vec::new(),
        };
        for (label, q) in generators {
            let conjugate = q.checked_conjugate().ok_or_else(|| {
                ProblemError::InvalidParameter(format!("generator {} is too large", label))
            })?;
            let normalized = problem.normalize(*q);
            problem.generators.push(normalized);
            let normalized = problem.normalize(conjugate);
            problem.generators.push(normalized);
        }
        Ok(problem)
    }

    /// Two SU(2) elements of denominators 85 and 154 with the commutator
    /// relation `(a b ai bi)^2 = -1` forbidden.
    pub fn su2_pair() -> Result<Self, ProblemError> {
        let problem = Self::new(
            "SU(2) pair",
            &[
                ("a", Quaternion::new(36, 0, 77, 0)),
                ("b", Quaternion::new(55, 71, 79, 97)),
            ],
            vec![2, 3, 5, 7, 11, 13, 17],
            ".",
        )?;
        [
            "a.b.ai.bi.a",
            "b.ai.bi.a.b",
            "ai.bi.a.b.ai",
            "bi.a.b.ai.bi",
            "b.a.bi.ai.b",
            "a.bi.ai.b.a",
            "bi.ai.b.a.bi",
            "ai.b.a.bi.ai",
        ]
        .iter()
        .try_fold(problem, |problem, subword| problem.with_forbidden_subword(subword))
    }

    /// Reject relations whose reduced word has at most `len` letters
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

    pub fn parse_word(&self, text: &str) -> Result<Word, ProblemError> {
        Word::parse(&self.alphabet, text).map_err(ProblemError::InvalidWord)
    }

    /// Multiply out a word from 1, normalizing after every step.
    ///
    /// Fails if the word is not over this problem's alphabet.
    pub fn evaluate(&self, word: &Word) -> Result<Exact<QuaternionState>, ProblemError> {
        check_alphabet(&self.alphabet, word)?;
        word.letters()
            .iter()
            .try_fold(self.normalize(Quaternion::one()), |acc, &letter| {
                self.generators
                    .get(letter as usize)
                    .map(|generator| self.multiply(&acc, generator))
                    .ok_or_else(|| {
                        ProblemError::InvalidWord(format!("no generator for letter {}", letter))
                    })
            })
    }

    fn normalize(&self, q: Quaternion) -> Exact<QuaternionState> {
        let mut values = q.to_array();
        primitize(&mut values, &self.primes);
        if sign_normalize(&mut values).is_none() {
            return Exact::Overflow;
        }
        let quaternion = Quaternion::from_array(values);
        quaternion
            .checked_norm()
            .map(|norm| QuaternionState { quaternion, norm })
            .into()
    }

    fn multiply(
        &self,
        a: &Exact<QuaternionState>,
        b: &Exact<QuaternionState>,
    ) -> Exact<QuaternionState> {
        match (a, b) {
            (Exact::Value(a), Exact::Value(b)) => match a.quaternion.checked_mul(&b.quaternion) {
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

    fn node(&self, state: Exact<QuaternionState>, word: Word) -> Node<Exact<QuaternionState>> {
        let score = match &state {
            Exact::Value(state) if !self.is_forbidden(&word) => log_abs(state.norm),
            _ => f64::INFINITY,
        };
        Node::new(state, word, score)
    }
}

impl SearchProblem for QuaternionProblem {
    type State = Exact<QuaternionState>;
    type Key = Option<[i128; 4]>;

    fn initial_node(&self) -> Node<Self::State> {
        Node::new(
            self.normalize(Quaternion::one()),
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
        node.state.value().map(|state| state.quaternion.to_array())
    }

    fn is_solution(&self, node: &Node<Self::State>) -> bool {
        node.state
            .value()
            .is_some_and(|state| state.quaternion.is_real() && state.quaternion.w != 0)
    }

    fn is_nontrivial(&self, node: &Node<Self::State>) -> bool {
        !self.is_forbidden(&node.word) && node.word.reduced().len() > self.trivial_len
    }

    fn format_score(&self, node: &Node<Self::State>) -> String {
        match node.state.value() {
            Some(state) => format!(
                "N={}",
                format_factorization(state.norm.unsigned_abs(), &self.primes)
            ),
            None => "overflow".to_string(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
