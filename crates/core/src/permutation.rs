//! Permutations of an alphabet, built from cycle notation.
//!
//! A cycle string such as `"(AELT) (BKNW) (S)"` sends `A→E→L→T→A`,
//! `B→K→N→W→B` and fixes `S`. Characters never mentioned map to themselves.
//! Whitespace anywhere in the string is ignored.
//!
//! # Representation
//!
//! Both directions are stored as fixed-size index tables, so `permute` and
//! `invert` are a single array lookup. The tables are filled together from
//! each cycle, which keeps them exact inverses of each other.
//!
//! # Example
//! ```
//! use enigma_core::alphabet::Alphabet;
//! use enigma_core::permutation::Permutation;
//! use std::sync::Arc;
//!
//! let alpha = Arc::new(Alphabet::default());
//! let perm = Permutation::new("(PNH) (ABDFIKLZYXW) (JC)", alpha).unwrap();
//! assert_eq!(perm.permute_char('A').unwrap(), 'B');
//! assert_eq!(perm.invert_char('P').unwrap(), 'H');
//! assert_eq!(perm.permute_char('E').unwrap(), 'E');
//! ```

use crate::alphabet::Alphabet;
use crate::error::{ConfigError, Result};
use std::fmt;
use std::sync::Arc;

/// A bijection on the indices of an [`Alphabet`].
///
/// # Invariants
/// - `forward` and `inverse` have exactly `alphabet.size()` entries
/// - `inverse[forward[i]] == i` and `forward[inverse[i]] == i` for all `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Box<[usize]>,
    inverse: Box<[usize]>,
}

impl Permutation {
    /// Parse `cycles` as cycle notation over `alphabet`.
    ///
    /// # Errors
    /// `ConfigError::MalformedCycles` for unbalanced or nested parentheses,
    /// empty cycles, characters outside parentheses, or a character listed
    /// twice; `ConfigError::UnknownChar` for a character not in the alphabet.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Box<[usize]> = (0..size).collect();
        let mut inverse: Box<[usize]> = (0..size).collect();
        let mut seen = vec![false; size];
        let mut current: Option<Vec<usize>> = None;

        let malformed = |reason: &str| ConfigError::MalformedCycles {
            cycles: cycles.to_string(),
            reason: reason.to_string(),
        };

        for ch in cycles.chars().filter(|c| !c.is_whitespace()) {
            match ch {
                '(' => {
                    if current.is_some() {
                        return Err(malformed("nested '('").into());
                    }
                    current = Some(Vec::new());
                }
                ')' => {
                    let cycle = current.take().ok_or_else(|| malformed("unbalanced ')'"))?;
                    if cycle.is_empty() {
                        return Err(malformed("empty cycle").into());
                    }
                    for (i, &from) in cycle.iter().enumerate() {
                        let to = cycle[(i + 1) % cycle.len()];
                        forward[from] = to;
                        inverse[to] = from;
                    }
                }
                _ => {
                    let cycle = current
                        .as_mut()
                        .ok_or_else(|| malformed(&format!("{ch:?} outside a cycle")))?;
                    let index = alphabet.require(ch)?;
                    if seen[index] {
                        return Err(malformed(&format!("{ch:?} appears more than once")).into());
                    }
                    seen[index] = true;
                    cycle.push(index);
                }
            }
        }

        if current.is_some() {
            return Err(malformed("unclosed '('").into());
        }

        Ok(Self {
            alphabet,
            forward,
            inverse,
        })
    }

    /// The permutation that fixes every character.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Box<[usize]> = (0..alphabet.size()).collect();
        Self {
            inverse: forward.clone(),
            forward,
            alphabet,
        }
    }

    /// Size of the alphabet I permute.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Reduce `p` modulo `size()` into `0..size()`.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Apply the permutation to index `p` (taken modulo the alphabet size).
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Apply the inverse permutation to index `c` (taken modulo the alphabet size).
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Apply the permutation to a character.
    ///
    /// # Errors
    /// `ConfigError::UnknownChar` if `ch` is not in the alphabet.
    pub fn permute_char(&self, ch: char) -> Result<char> {
        let index = self.alphabet.require(ch)?;
        Ok(self.alphabet.char_unchecked(self.forward[index]))
    }

    /// Apply the inverse permutation to a character.
    ///
    /// # Errors
    /// `ConfigError::UnknownChar` if `ch` is not in the alphabet.
    pub fn invert_char(&self, ch: char) -> Result<char> {
        let index = self.alphabet.require(ch)?;
        Ok(self.alphabet.char_unchecked(self.inverse[index]))
    }

    /// The alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// True iff no character maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i != j)
    }
}

impl fmt::Display for Permutation {
    /// Canonical cycle notation: non-trivial cycles only, each starting at
    /// its lowest index, separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut visited = vec![false; self.size()];
        let mut first = true;
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;

            write!(f, "(")?;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                write!(f, "{}", self.alphabet.char_unchecked(i))?;
                i = self.forward[i];
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    /// Check that `perm` maps each character of `from` to the character at the
    /// same position in `to`, in both directions and for both indices and chars.
    fn check_perm(perm: &Permutation, test_id: &str, from: &str, to: &str) {
        assert_eq!(perm.size(), from.len(), "{test_id} (wrong length)");
        for (c, e) in from.chars().zip(to.chars()) {
            assert_eq!(perm.permute_char(c).unwrap(), e, "{test_id}: wrong translation of {c:?}");
            assert_eq!(perm.invert_char(e).unwrap(), c, "{test_id}: wrong inverse of {e:?}");
            let ci = UPPER.find(c).unwrap();
            let ei = UPPER.find(e).unwrap();
            assert_eq!(perm.permute(ci), ei, "{test_id}: wrong translation of {ci}");
            assert_eq!(perm.invert(ei), ci, "{test_id}: wrong inverse of {ei}");
        }
    }

    #[test]
    fn test_identity_transform() {
        let perm = Permutation::new("", upper()).unwrap();
        check_perm(&perm, "identity", UPPER, UPPER);
        assert_eq!(perm, Permutation::identity(upper()));
        assert!(!perm.derangement());
    }

    #[test]
    fn test_full_rotor_i_mapping() {
        let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", upper()).unwrap();
        check_perm(&perm, "rotor I", UPPER, "EKMFLGDQVZNTOWYHXUSPAIBRCJ");
    }

    #[test]
    fn test_permute_char() {
        let perm = Permutation::new("(PNH) (ABDFIKLZYXW) (JC)", upper()).unwrap();
        assert_eq!(perm.permute_char('A').unwrap(), 'B');
        assert_eq!(perm.permute_char('H').unwrap(), 'P');
        assert_eq!(perm.permute_char('E').unwrap(), 'E');
        assert_eq!(perm.permute_char('K').unwrap(), 'L');
        assert_eq!(perm.permute_char('W').unwrap(), 'A');
    }

    #[test]
    fn test_invert_char() {
        let perm = Permutation::new("(PNH) (ABDFIKLZYXW) (JC)", upper()).unwrap();
        assert_eq!(perm.invert_char('Z').unwrap(), 'L');
        assert_eq!(perm.invert_char('G').unwrap(), 'G');
        assert_eq!(perm.invert_char('P').unwrap(), 'H');
        assert_eq!(perm.invert_char('A').unwrap(), 'W');
    }

    #[test]
    fn test_whitespace_ignored() {
        let spaced = Permutation::new("  ( A B C )\t(D E)\n", upper()).unwrap();
        let tight = Permutation::new("(ABC)(DE)", upper()).unwrap();
        assert_eq!(spaced, tight);
    }

    #[test]
    fn test_singleton_cycle_is_fixed_point() {
        let perm = Permutation::new("(A) (BC)", upper()).unwrap();
        assert_eq!(perm.permute_char('A').unwrap(), 'A');
        assert_eq!(perm.permute_char('B').unwrap(), 'C');
        assert_eq!(perm.permute_char('C').unwrap(), 'B');
    }

    #[test]
    fn test_derangement() {
        let full = Permutation::new("(ZYXWVUTSRQPONMLKJIHGFEDCBA)", upper()).unwrap();
        assert!(full.derangement());

        let partial = Permutation::new("(PNH) (ABDFIKLZYXW) (JC)", upper()).unwrap();
        assert!(!partial.derangement());

        let reflector = Permutation::new(
            "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
            upper(),
        )
        .unwrap();
        assert!(reflector.derangement());
    }

    #[test]
    fn test_out_of_range_index_wraps() {
        let perm = Permutation::new("(AB)", upper()).unwrap();
        assert_eq!(perm.permute(26), 1);
        assert_eq!(perm.invert(27), 0);
        assert_eq!(perm.wrap(-1), 25);
        assert_eq!(perm.wrap(52), 0);
    }

    #[test]
    fn test_display_is_canonical() {
        let perm = Permutation::new("(CAB) (Z) (YX)", upper()).unwrap();
        assert_eq!(perm.to_string(), "(ABC) (XY)");
        let reparsed = Permutation::new(&perm.to_string(), upper()).unwrap();
        assert_eq!(reparsed, perm);
        assert_eq!(Permutation::identity(upper()).to_string(), "");
    }

    #[test]
    fn test_unknown_char_rejected() {
        let result = Permutation::new("(AB1)", upper());
        assert!(matches!(result, Err(Error::Config(ConfigError::UnknownChar('1')))));

        let perm = Permutation::identity(upper());
        assert!(perm.permute_char('a').is_err());
        assert!(perm.invert_char('!').is_err());
    }

    #[test]
    fn test_malformed_cycles_rejected() {
        for bad in ["(AB", "AB)", "(A(B))", "()", "A(BC)", "(AB) C", "(ABA)", "(AB) (BC)"] {
            let result = Permutation::new(bad, upper());
            assert!(
                matches!(result, Err(Error::Config(ConfigError::MalformedCycles { .. }))),
                "{bad:?} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_non_contiguous_alphabet() {
        let alpha = Arc::new(Alphabet::new("QWERTY".chars()).unwrap());
        let perm = Permutation::new("(QY) (WE)", alpha).unwrap();
        assert_eq!(perm.permute(0), 5);
        assert_eq!(perm.permute(1), 2);
        assert_eq!(perm.permute_char('R').unwrap(), 'R');
    }
}
