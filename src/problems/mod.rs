//! Reference problems for the FlashBeam engine
//!
//! - [`CyclicProblem`]: the cyclic group ℤ/n, small enough to reason about by hand
//! - [`MatrixProblem`]: 2×2 integer matrices up to scalars from a prime set,
//!   with the Long–Reid family as a preset
//! - [`QuaternionProblem`]: integer quaternions up to real scalars

pub mod cyclic;
pub mod matrix;
pub mod quaternion;

pub use cyclic::{CyclicProblem, CyclicState};
pub use matrix::{Mat2, MatrixProblem, MatrixState};
pub use quaternion::{Quaternion, QuaternionProblem, QuaternionState};

use crate::search::word::{Alphabet, Word};
use thiserror::Error;

/// Errors building a reference problem or reading a word for it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Alphabet has {letters} letters but {generators} generators were given")]
    GeneratorMismatch { letters: usize, generators: usize },

    #[error("Invalid word: {0}")]
    InvalidWord(String),
}

/// An exact integer value, or the marker left behind when arithmetic overflowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exact<T> {
    Value(T),
    Overflow,
}

impl<T> Exact<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Exact::Value(v) => Some(v),
            Exact::Overflow => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Exact::Overflow)
    }
}

impl<T> From<Option<T>> for Exact<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Exact::Overflow, Exact::Value)
    }
}

/// Reject words built over some other alphabet
pub(crate) fn check_alphabet(alphabet: &Alphabet, word: &Word) -> Result<(), ProblemError> {
    if word.alphabet().as_ref() == alphabet {
        Ok(())
    } else {
        Err(ProblemError::InvalidWord(format!(
            "'{}' is not over this problem's alphabet",
            word
        )))
    }
}

/// Divide out every prime in `primes` that divides all of `values`.
///
/// The all-zero vector is left alone.
pub(crate) fn primitize(values: &mut [i128], primes: &[i128]) {
    if values.iter().all(|&v| v == 0) {
        return;
    }
    for &p in primes {
        while values.iter().all(|&v| v % p == 0) {
            for v in values.iter_mut() {
                *v /= p;
            }
        }
    }
}

/// Flip signs so the first non-zero entry is positive. `None` on overflow.
pub(crate) fn sign_normalize(values: &mut [i128]) -> Option<()> {
    if values.iter().find(|&&v| v != 0).is_some_and(|&v| v < 0) {
        for v in values.iter_mut() {
            *v = v.checked_neg()?;
        }
    }
    Some(())
}

/// Distinct prime factors of `n`, ascending
pub(crate) fn prime_factors(n: u128) -> Vec<i128> {
    let mut factors = Vec::new();
    let mut rest = n;
    let mut p: u128 = 2;
    while p * p <= rest {
        if rest % p == 0 {
            factors.push(p as i128);
            while rest % p == 0 {
                rest /= p;
            }
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if rest > 1 {
        factors.push(rest as i128);
    }
    factors
}

/// Write `n` as a product over `primes`, e.g. `2^6 * 3`, with any cofactor last
pub(crate) fn format_factorization(n: u128, primes: &[i128]) -> String {
    match n {
        0 => return "0".to_string(),
        1 => return "1".to_string(),
        _ => {}
    }

    let mut sorted: Vec<u128> = primes.iter().map(|&p| p.unsigned_abs()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut rest = n;
    for p in sorted.into_iter().filter(|&p| p > 1) {
        let mut exponent = 0;
        while rest % p == 0 {
            rest /= p;
            exponent += 1;
        }
        match exponent {
            0 => {}
            1 => parts.push(p.to_string()),
            e => parts.push(format!("{}^{}", p, e)),
        }
    }
    if rest > 1 {
        parts.push(rest.to_string());
    }
    parts.join(" * ")
}

/// `ln |n|` as a score, `+inf` for zero
pub(crate) fn log_abs(n: i128) -> f64 {
    if n == 0 {
        f64::INFINITY
    } else {
        (n.unsigned_abs() as f64).ln()
    }
}
