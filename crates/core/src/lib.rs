//! enigma-core: rotor cipher machine simulation
//!
//! This library models an electromechanical rotor cipher machine:
//! - Permutations of a fixed alphabet, written in cycle notation
//! - Moving, fixed and reflecting rotors with notch-driven stepping
//! - A machine that validates rotor selections, steps with the double-step
//!   rule and runs each keystroke through a reciprocal signal path
//!
//! # Architecture
//!
//! Modules depend on each other strictly bottom-up:
//! - `alphabet`: ordered character sets, char <-> index
//! - `permutation`: cycle-notation parsing, forward and inverse tables
//! - `rotor`: permutation plus position, tagged by rotor kind
//! - `machine`: slots, plugboard, stepping and conversion
//! - `error`: structured error taxonomy
//!
//! # Design Principles
//!
//! - **No panics**: invalid configuration, selections, settings and messages
//!   are reported as structured errors
//! - **All-or-nothing**: a rejected call leaves the machine as it was
//! - **Single session**: a `Machine` is mutated through `&mut self` only;
//!   alphabets and permutations are immutable and shared by `Arc`

pub mod alphabet;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;

// Re-export commonly used types
pub use alphabet::Alphabet;
pub use error::{Error, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind, RotorSpec, RotorSpecKind};
