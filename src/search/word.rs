//! Structured words over a generator alphabet
//!
//! A [`Word`] is the sequence of generator letters that produced a state from
//! the root. Words share their letter storage, so cloning a node is cheap even
//! when its word is long. Free reduction (cancelling a letter against its
//! inverse) is explicit: [`Word::concat`] keeps every letter, while
//! [`Word::concat_reduced`] cancels adjacent inverse pairs. Which one a problem
//! uses is a domain decision.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Index of a letter in an [`Alphabet`]
pub type Letter = u16;

/// Generator labels, their inverse pairing, and the separator used for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    labels: Vec<String>,
    inverses: Vec<Option<Letter>>,
    separator: String,
}

impl Alphabet {
    /// Largest number of letters an alphabet can hold
    pub const MAX_LETTERS: usize = Letter::MAX as usize + 1;

    /// Create an empty alphabet whose words display with `separator` between letters
    pub fn new(separator: &str) -> Self {
        Self {
            labels: Vec::new(),
            inverses: Vec::new(),
            separator: separator.to_string(),
        }
    }

    /// Build an alphabet from `(label, inverse_label)` pairs.
    ///
    /// Letters are assigned in order: the first pair gets letters 0 and 1,
    /// the second 2 and 3, and so on.
    pub fn from_inverse_pairs(pairs: &[(&str, &str)], separator: &str) -> Self {
        pairs
            .iter()
            .fold(Self::new(separator), |alphabet, (label, inverse)| {
                alphabet.with_inverse_pair(label, inverse)
            })
    }

    /// Add a letter with no known inverse.
    ///
    /// Panics if the alphabet already holds [`MAX_LETTERS`](Self::MAX_LETTERS) letters.
    pub fn with_letter(mut self, label: &str) -> Self {
        self.reserve_letters(1);
        self.labels.push(label.to_string());
        self.inverses.push(None);
        self
    }

    /// Add a letter and its inverse.
    ///
    /// Panics if the pair does not fit in [`MAX_LETTERS`](Self::MAX_LETTERS).
    pub fn with_inverse_pair(mut self, label: &str, inverse_label: &str) -> Self {
        let letter = self.reserve_letters(2);
        self.labels.push(label.to_string());
        self.labels.push(inverse_label.to_string());
        self.inverses.push(Some(letter + 1));
        self.inverses.push(Some(letter));
        self
    }

    /// Index of the next letter, after checking `count` more letters fit
    fn reserve_letters(&self, count: usize) -> Letter {
        let next = self.labels.len();
        assert!(
            next + count <= Self::MAX_LETTERS,
            "alphabet is limited to {} letters",
            Self::MAX_LETTERS
        );
        next as Letter
    }

    /// Number of letters
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Display label of a letter
    pub fn label(&self, letter: Letter) -> &str {
        self.labels
            .get(letter as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Look up a letter by its label
    pub fn letter(&self, label: &str) -> Option<Letter> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| idx as Letter)
    }

    /// Inverse of a letter, if the alphabet pairs it with one
    pub fn inverse(&self, letter: Letter) -> Option<Letter> {
        self.inverses.get(letter as usize).copied().flatten()
    }

    /// True if `b` cancels `a` under free reduction
    pub fn cancels(&self, a: Letter, b: Letter) -> bool {
        self.inverse(a) == Some(b)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Iterate over all letters in order
    pub fn letters(&self) -> impl Iterator<Item = Letter> {
        (0..self.labels.len()).map(|idx| idx as Letter)
    }
}

/// A sequence of letters over a shared alphabet
#[derive(Clone)]
pub struct Word {
    alphabet: Arc<Alphabet>,
    letters: Arc<[Letter]>,
}

impl Word {
    /// The empty word (identifier of the root node)
    pub fn empty(alphabet: &Arc<Alphabet>) -> Self {
        Self::from_letters(alphabet, Vec::new())
    }

    /// A single-letter word
    pub fn letter(alphabet: &Arc<Alphabet>, letter: Letter) -> Self {
        Self::from_letters(alphabet, vec![letter])
    }

    pub fn from_letters(alphabet: &Arc<Alphabet>, letters: Vec<Letter>) -> Self {
        Self {
            alphabet: Arc::clone(alphabet),
            letters: letters.into(),
        }
    }

    /// Parse a word written with the alphabet's labels and separator.
    ///
    /// An alphabet with a blank separator reads one character per letter.
    pub fn parse(alphabet: &Arc<Alphabet>, text: &str) -> Result<Self, String> {
        let separator = alphabet.separator().trim();
        let tokens: Vec<String> = if separator.is_empty() {
            text.chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_string())
                .collect()
        } else {
            text.split(separator)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        };

        let letters = tokens
            .iter()
            .map(|token| {
                alphabet
                    .letter(token)
                    .ok_or_else(|| format!("Unknown generator label: '{}'", token))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_letters(alphabet, letters))
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Concatenate without any cancellation
    pub fn concat(&self, other: &Word) -> Word {
        let mut letters = Vec::with_capacity(self.len() + other.len());
        letters.extend_from_slice(&self.letters);
        letters.extend_from_slice(&other.letters);
        Self::from_letters(&self.alphabet, letters)
    }

    /// Concatenate and freely reduce the result
    pub fn concat_reduced(&self, other: &Word) -> Word {
        let mut stack = Vec::with_capacity(self.len() + other.len());
        self.push_reduced(&mut stack, &self.letters);
        self.push_reduced(&mut stack, &other.letters);
        Self::from_letters(&self.alphabet, stack)
    }

    /// Freely reduced form of this word
    pub fn reduced(&self) -> Word {
        let mut stack = Vec::with_capacity(self.len());
        self.push_reduced(&mut stack, &self.letters);
        Self::from_letters(&self.alphabet, stack)
    }

    /// True if no two adjacent letters cancel
    pub fn is_reduced(&self) -> bool {
        self.letters
            .windows(2)
            .all(|pair| !self.alphabet.cancels(pair[0], pair[1]))
    }

    /// Formal inverse: letters reversed and inverted.
    ///
    /// Returns `None` if some letter has no inverse in the alphabet.
    pub fn inverse(&self) -> Option<Word> {
        let letters = self
            .letters
            .iter()
            .rev()
            .map(|&l| self.alphabet.inverse(l))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::from_letters(&self.alphabet, letters))
    }

    /// True if `pattern` occurs as a contiguous subword
    pub fn contains_subword(&self, pattern: &[Letter]) -> bool {
        if pattern.is_empty() {
            return true;
        }
        self.letters.windows(pattern.len()).any(|w| w == pattern)
    }

    fn push_reduced(&self, stack: &mut Vec<Letter>, letters: &[Letter]) {
        for &letter in letters {
            match stack.last() {
                Some(&top) if self.alphabet.cancels(top, letter) => {
                    stack.pop();
                }
                _ => stack.push(letter),
            }
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.letters == other.letters
            && (Arc::ptr_eq(&self.alphabet, &other.alphabet) || self.alphabet == other.alphabet)
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.letters.hash(state);
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, &letter) in self.letters.iter().enumerate() {
            if idx > 0 {
                f.write_str(self.alphabet.separator())?;
            }
            f.write_str(self.alphabet.label(letter))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", self.to_string())
    }
}
