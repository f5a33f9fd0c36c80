//! The assembled machine: rotor slots, stepping, and the signal path.
//!
//! A [`Machine`] owns a catalog of available rotors and a row of slots. Slot
//! 0 (leftmost) holds the reflector; the last slot is the fast rotor that
//! steps on every keystroke.
//!
//! # Keystroke
//!
//! 1. **Step**: the rightmost rotor always advances. Any rotor at its notch
//!    whose left neighbour rotates advances together with that neighbour.
//!    Every decision reads the positions from *before* this keystroke, and
//!    the advances are applied afterwards in one pass. This is what produces
//!    the double step of the middle rotor.
//! 2. **Signal**: plugboard, right-to-left through every slot including the
//!    reflector, left-to-right back through every slot except the reflector,
//!    then the plugboard inverse.
//!
//! For a fixed rotor state the signal path is an involution, so encryption
//! and decryption are the same operation from the same starting setting.
//!
//! # Example
//! ```
//! use enigma_core::alphabet::Alphabet;
//! use enigma_core::machine::Machine;
//! use enigma_core::permutation::Permutation;
//! use enigma_core::rotor::Rotor;
//! use std::sync::Arc;
//!
//! let alpha = Arc::new(Alphabet::default());
//! let perm = |c: &str| Permutation::new(c, Arc::clone(&alpha)).unwrap();
//! let catalog = vec![
//!     Rotor::reflector("B", perm("(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)")),
//!     Rotor::moving("III", perm("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap(),
//! ];
//! let mut machine = Machine::new(Arc::clone(&alpha), 2, 1, catalog).unwrap();
//! machine.insert_rotors(&["B", "III"]).unwrap();
//! machine.set_rotors("A").unwrap();
//! let cipher = machine.convert("HELLO").unwrap();
//!
//! machine.set_rotors("A").unwrap();
//! assert_eq!(machine.convert(&cipher).unwrap(), "HELLO");
//! ```

use crate::alphabet::Alphabet;
use crate::error::{AssemblyError, ConfigError, ConversionError, Result, SettingError};
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// A rotor machine session.
///
/// # Invariants
/// - `num_rotors > 1` and `num_pawls < num_rotors`
/// - `slots` is either empty or holds exactly `num_rotors` rotors, with a
///   reflector in slot 0 only and exactly `num_pawls` rotating rotors
/// - every rotor and the plugboard share `alphabet`
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: HashMap<String, Rotor>,
    slots: Vec<Rotor>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// A machine with `num_rotors` slots and `num_pawls` pawls, able to
    /// install any rotor from `catalog`.
    ///
    /// # Errors
    /// - `ConfigError::InvalidDimensions` unless `1 < num_rotors` and `num_pawls < num_rotors`
    /// - `ConfigError::AlphabetMismatch` if a rotor uses another alphabet
    /// - `ConfigError::DuplicateDefinition` if two rotors share a name
    pub fn new<I>(alphabet: Arc<Alphabet>, num_rotors: usize, num_pawls: usize, catalog: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rotor>,
    {
        if num_rotors <= 1 || num_pawls >= num_rotors {
            return Err(ConfigError::InvalidDimensions {
                rotors: num_rotors,
                pawls: num_pawls,
            }
            .into());
        }

        let mut rotors = HashMap::new();
        for rotor in catalog {
            if rotor.alphabet().as_ref() != alphabet.as_ref() {
                return Err(ConfigError::AlphabetMismatch(format!("rotor {}", rotor.name())).into());
            }
            let name = rotor.name().to_string();
            if rotors.insert(name.clone(), rotor).is_some() {
                return Err(ConfigError::DuplicateDefinition(name).into());
            }
        }

        debug!(
            rotors = num_rotors,
            pawls = num_pawls,
            available = rotors.len(),
            "machine configured"
        );

        Ok(Self {
            alphabet,
            num_rotors,
            num_pawls,
            catalog: rotors,
            slots: Vec::with_capacity(num_rotors),
            plugboard: None,
        })
    }

    /// Number of rotor slots, reflector included.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and thus of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Whether `insert_rotors` has succeeded at least once.
    pub fn has_rotors(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Names of the installed rotors, left to right.
    pub fn slot_names(&self) -> Vec<&str> {
        self.slots.iter().map(Rotor::name).collect()
    }

    /// Installed rotors, left to right.
    pub fn slots(&self) -> &[Rotor] {
        &self.slots
    }

    /// Current positions of slots 1.. as alphabet characters.
    pub fn settings(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .map(|rotor| self.alphabet.char_unchecked(rotor.setting()))
            .collect()
    }

    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// Install the catalog rotors named by `names`, reflector first. Each
    /// installed rotor starts at position 0.
    ///
    /// The selection is fully validated before anything is installed; on
    /// error the previous slots are left as they were.
    ///
    /// # Errors
    /// In checking order: `WrongRotorCount`, `RotorNotFound`, `PawlMismatch`,
    /// `DuplicateRotor`, `MissingReflector`, `ExtraReflector`.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(AssemblyError::WrongRotorCount {
                expected: self.num_rotors,
                actual: names.len(),
            }
            .into());
        }

        let selected = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.catalog
                    .get(name)
                    .ok_or_else(|| AssemblyError::RotorNotFound(name.to_string()))
            })
            .collect::<std::result::Result<Vec<&Rotor>, _>>()?;

        let moving = selected.iter().filter(|rotor| rotor.rotates()).count();
        if moving != self.num_pawls {
            return Err(AssemblyError::PawlMismatch {
                pawls: self.num_pawls,
                moving,
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(selected.len());
        for rotor in &selected {
            if !seen.insert(rotor.name()) {
                return Err(AssemblyError::DuplicateRotor(rotor.name().to_string()).into());
            }
        }

        if !selected[0].reflecting() {
            return Err(AssemblyError::MissingReflector(selected[0].name().to_string()).into());
        }
        if let Some((slot, rotor)) = selected.iter().enumerate().skip(1).find(|(_, r)| r.reflecting()) {
            return Err(AssemblyError::ExtraReflector {
                name: rotor.name().to_string(),
                slot,
            }
            .into());
        }

        self.slots = selected
            .into_iter()
            .map(|rotor| {
                let mut fresh = rotor.clone();
                fresh.reset();
                fresh
            })
            .collect();

        debug!(rotors = ?self.slot_names(), "rotors inserted");
        Ok(())
    }

    /// Position slots 1.. from `setting`, one alphabet character per slot,
    /// left to right.
    ///
    /// # Errors
    /// `SettingError::NoRotors`, `SettingError::LengthMismatch`, or
    /// `SettingError::UnknownChar`; nothing moves on error.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        if self.slots.is_empty() {
            return Err(SettingError::NoRotors.into());
        }

        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(SettingError::LengthMismatch { expected, actual }.into());
        }

        let positions = setting
            .chars()
            .map(|ch| self.alphabet.index_of(ch).ok_or(SettingError::UnknownChar(ch)))
            .collect::<std::result::Result<Vec<usize>, _>>()?;

        for (rotor, position) in self.slots.iter_mut().skip(1).zip(positions) {
            rotor.set(position)?;
        }

        debug!(setting, "rotors set");
        Ok(())
    }

    /// Replace the plugboard; `None` removes it.
    ///
    /// # Errors
    /// `ConfigError::AlphabetMismatch` if the plugboard uses another alphabet.
    pub fn set_plugboard(&mut self, plugboard: Option<Permutation>) -> Result<()> {
        if let Some(perm) = &plugboard {
            if perm.alphabet().as_ref() != self.alphabet.as_ref() {
                return Err(ConfigError::AlphabetMismatch("plugboard".to_string()).into());
            }
        }
        debug!(plugboard = %plugboard.as_ref().map(ToString::to_string).unwrap_or_default(), "plugboard set");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Parse `cycles` over the machine alphabet and install it as the plugboard.
    pub fn set_plugboard_cycles(&mut self, cycles: &str) -> Result<()> {
        let perm = Permutation::new(cycles, Arc::clone(&self.alphabet))?;
        self.set_plugboard(Some(perm))
    }

    /// Advance the rotors for one keystroke.
    fn step(&mut self) {
        let n = self.slots.len();
        let mut advancing = vec![false; n];
        advancing[n - 1] = true;
        for i in (1..n).rev() {
            if self.slots[i].at_notch() && self.slots[i - 1].rotates() {
                advancing[i] = true;
                advancing[i - 1] = true;
            }
        }

        for (rotor, _) in self.slots.iter_mut().zip(&advancing).filter(|(_, go)| **go) {
            rotor.advance();
        }

        trace!(positions = %self.settings(), "stepped");
    }

    /// Step the rotors, then send index `c` through the signal path.
    ///
    /// # Errors
    /// `ConversionError::NoRotors` before any rotors are inserted,
    /// `ConversionError::OutOfRange` for an index past the alphabet.
    pub fn convert_index(&mut self, c: usize) -> Result<usize> {
        if self.slots.is_empty() {
            return Err(ConversionError::NoRotors.into());
        }
        if c >= self.alphabet.size() {
            return Err(ConversionError::OutOfRange {
                index: c,
                size: self.alphabet.size(),
            }
            .into());
        }
        Ok(self.keystroke(c))
    }

    fn keystroke(&mut self, c: usize) -> usize {
        self.step();

        let mut signal = match &self.plugboard {
            Some(plugboard) => plugboard.permute(c),
            None => c,
        };
        for rotor in self.slots.iter().rev() {
            signal = rotor.convert_forward(signal);
        }
        for rotor in self.slots.iter().skip(1) {
            signal = rotor.convert_backward(signal);
        }
        match &self.plugboard {
            Some(plugboard) => plugboard.invert(signal),
            None => signal,
        }
    }

    /// Convert a message, ignoring whitespace and folding case to the
    /// alphabet's convention. Rotor positions carry over between calls.
    ///
    /// # Errors
    /// `ConversionError::NoRotors` before any rotors are inserted,
    /// `ConversionError::UnknownChar` for a character outside the alphabet.
    /// The message is checked before any rotor moves.
    pub fn convert(&mut self, message: &str) -> Result<String> {
        if self.slots.is_empty() {
            return Err(ConversionError::NoRotors.into());
        }

        let indices = message
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                self.alphabet
                    .index_of(self.alphabet.normalize(c))
                    .ok_or(ConversionError::UnknownChar(c))
            })
            .collect::<std::result::Result<Vec<usize>, _>>()?;

        let converted = indices
            .into_iter()
            .map(|c| {
                let out = self.keystroke(c);
                self.alphabet.char_unchecked(out)
            })
            .collect();
        Ok(converted)
    }
}
