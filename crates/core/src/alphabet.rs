//! Ordered character sets that the machine operates over.
//!
//! An [`Alphabet`] maps each of its characters to a unique index in
//! `0..size()` and back. Every other component works on indices; characters
//! only appear at the edges (settings strings, messages, cycle notation).
//!
//! # Example
//! ```
//! use enigma_core::alphabet::Alphabet;
//!
//! let alpha = Alphabet::range('A', 'Z').unwrap();
//! assert_eq!(alpha.size(), 26);
//! assert_eq!(alpha.index_of('C'), Some(2));
//! assert_eq!(alpha.char_at(25), Some('Z'));
//! ```

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::fmt;

/// Case convention messages are folded into before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Preserve,
}

/// An ordered set of distinct characters, indexable both ways.
///
/// # Invariants
/// - at least one character
/// - no character appears twice
/// - `index_of(char_at(i)) == Some(i)` for every `i < size()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    lookup: HashMap<char, usize>,
    case: Case,
}

impl Alphabet {
    /// Build an alphabet from an explicit ordered list of characters.
    ///
    /// # Errors
    /// `ConfigError::EmptyAlphabet` for an empty list,
    /// `ConfigError::DuplicateAlphabetChar` if a character repeats.
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Result<Self> {
        let chars: Vec<char> = chars.into_iter().collect();
        if chars.is_empty() {
            return Err(ConfigError::EmptyAlphabet.into());
        }

        let mut lookup = HashMap::with_capacity(chars.len());
        for (i, &ch) in chars.iter().enumerate() {
            if lookup.insert(ch, i).is_some() {
                return Err(ConfigError::DuplicateAlphabetChar(ch).into());
            }
        }

        let has_upper = chars.iter().any(|c| c.is_uppercase());
        let has_lower = chars.iter().any(|c| c.is_lowercase());
        let case = match (has_upper, has_lower) {
            (true, false) => Case::Upper,
            (false, true) => Case::Lower,
            _ => Case::Preserve,
        };

        Ok(Self { chars, lookup, case })
    }

    /// Build the inclusive contiguous range `first..=last`.
    ///
    /// # Errors
    /// `ConfigError::InvalidRange` if `first > last`.
    pub fn range(first: char, last: char) -> Result<Self> {
        if first > last {
            return Err(ConfigError::InvalidRange { first, last }.into());
        }
        Self::new(first..=last)
    }

    /// Number of characters.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Whether `ch` belongs to this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.lookup.contains_key(&ch)
    }

    /// Index of `ch`, if present.
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.lookup.get(&ch).copied()
    }

    /// Character at `index`, if in range.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// Index of `ch`, or `ConfigError::UnknownChar`.
    pub(crate) fn require(&self, ch: char) -> Result<usize> {
        self.index_of(ch)
            .ok_or_else(|| ConfigError::UnknownChar(ch).into())
    }

    /// Character at an index already known to be in range.
    pub(crate) fn char_unchecked(&self, index: usize) -> char {
        self.chars[index]
    }

    /// Fold `ch` into the alphabet's case convention.
    ///
    /// All-uppercase alphabets upper-case their input, all-lowercase ones
    /// lower-case it; mixed or caseless alphabets leave it alone. A character
    /// whose case mapping is not a single character is returned unchanged.
    pub fn normalize(&self, ch: char) -> char {
        match self.case {
            Case::Upper => single(ch.to_uppercase()).unwrap_or(ch),
            Case::Lower => single(ch.to_lowercase()).unwrap_or(ch),
            Case::Preserve => ch,
        }
    }

    /// Iterate characters in index order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let first = it.next()?;
    match it.next() {
        None => Some(first),
        Some(_) => None,
    }
}

impl Default for Alphabet {
    /// The upper-case Latin alphabet `A..=Z`.
    fn default() -> Self {
        let chars: Vec<char> = ('A'..='Z').collect();
        let lookup = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            chars,
            lookup,
            case: Case::Upper,
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
