//! Rotors: a permutation plus a rotational position.
//!
//! Three kinds of rotor exist, distinguished by [`RotorKind`]:
//! - **Moving**: advances when driven by a pawl; carries notch positions
//! - **Fixed**: never moves
//! - **Reflecting**: never moves, only ever sits in the leftmost slot
//!
//! The machine only asks capability questions (`rotates`, `reflecting`,
//! `at_notch`) and calls `advance`, so the stepping rule stays total over
//! every kind.
//!
//! # Signal path
//!
//! A rotor at position `k` is its permutation conjugated by a shift of `k`:
//! the contact a signal enters is offset by `k`, permuted, then shifted back.

use crate::alphabet::Alphabet;
use crate::error::{Result, SettingError};
use crate::permutation::Permutation;
use std::sync::Arc;

/// Behavior that differs between rotor kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Rotating rotor; `notches[i]` is true when position `i` is a notch
    Moving { notches: Box<[bool]> },
    /// Stationary rotor
    Fixed,
    /// Stationary rotor that folds the signal back
    Reflecting,
}

/// A named rotor with its current position.
///
/// # Invariants
/// - `position < permutation.size()`
/// - a reflecting rotor's position is always 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    position: usize,
    kind: RotorKind,
}

impl Rotor {
    /// A rotating rotor with notches at the characters of `notches`.
    ///
    /// # Errors
    /// `ConfigError::UnknownChar` if a notch is not in the alphabet.
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet();
        let mut marks = vec![false; alphabet.size()].into_boxed_slice();
        for ch in notches.chars() {
            marks[alphabet.require(ch)?] = true;
        }
        Ok(Self::with_kind(name, permutation, RotorKind::Moving { notches: marks }))
    }

    /// A rotor that never moves.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name, permutation, RotorKind::Fixed)
    }

    /// A reflector. Reflectors are expected to be derangements; one that is
    /// not is accepted but logged.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        let rotor = Self::with_kind(name, permutation, RotorKind::Reflecting);
        if !rotor.permutation.derangement() {
            tracing::warn!(rotor = %rotor.name, "reflector permutation has fixed points");
        }
        rotor
    }

    fn with_kind(name: impl Into<String>, permutation: Permutation, kind: RotorKind) -> Self {
        Self {
            name: name.into(),
            permutation,
            position: 0,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True iff this rotor is driven by a pawl.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True iff this rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflecting)
    }

    /// True iff this is a moving rotor currently sitting on one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches[self.position],
            RotorKind::Fixed | RotorKind::Reflecting => false,
        }
    }

    /// Current position.
    pub fn setting(&self) -> usize {
        self.position
    }

    /// Move directly to `position`.
    ///
    /// # Errors
    /// `SettingError::OutOfRange` past the alphabet,
    /// `SettingError::ReflectorPosition` for a nonzero reflector position.
    pub fn set(&mut self, position: usize) -> Result<()> {
        if position >= self.size() {
            return Err(SettingError::OutOfRange {
                position,
                size: self.size(),
            }
            .into());
        }
        if self.reflecting() && position != 0 {
            return Err(SettingError::ReflectorPosition(self.name.clone()).into());
        }
        self.position = position;
        Ok(())
    }

    /// Move to the position named by alphabet character `ch`.
    pub fn set_char(&mut self, ch: char) -> Result<()> {
        let position = self
            .alphabet()
            .index_of(ch)
            .ok_or(SettingError::UnknownChar(ch))?;
        self.set(position)
    }

    /// Return to position 0.
    pub(crate) fn reset(&mut self) {
        self.position = 0;
    }

    /// Step one position. No-op for fixed rotors and reflectors.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.position = (self.position + 1) % self.size();
        }
    }

    /// Convert contact `p` entering from the right to the contact it leaves
    /// on the left, accounting for the current position.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.position as i64;
        let entered = self.permutation.wrap(p as i64 + offset);
        self.permutation.wrap(self.permutation.permute(entered) as i64 - offset)
    }

    /// Convert contact `e` entering from the left to the contact it leaves
    /// on the right, accounting for the current position.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.position as i64;
        let entered = self.permutation.wrap(e as i64 + offset);
        self.permutation.wrap(self.permutation.invert(entered) as i64 - offset)
    }
}

/// Rotor descriptor as read from a configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorSpec {
    pub name: String,
    pub kind: RotorSpecKind,
    pub cycles: String,
}

/// Kind of rotor a descriptor asks for; notches as alphabet characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorSpecKind {
    Moving { notches: String },
    Fixed,
    Reflecting,
}

impl RotorSpec {
    /// Build the rotor this descriptor describes over `alphabet`.
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        let permutation = Permutation::new(&self.cycles, Arc::clone(alphabet))?;
        match &self.kind {
            RotorSpecKind::Moving { notches } => Rotor::moving(self.name.clone(), permutation, notches),
            RotorSpecKind::Fixed => Ok(Rotor::fixed(self.name.clone(), permutation)),
            RotorSpecKind::Reflecting => Ok(Rotor::reflector(self.name.clone(), permutation)),
        }
    }
}
