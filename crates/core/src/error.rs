//! Error types for the rotor machine.
//!
//! Every failure is a configuration or usage error: nothing here is retried.
//! Each variant carries the offending name or value so callers can report
//! exactly what was rejected.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Config: alphabets, cycle notation, machine dimensions, config files
/// - Assembly: choosing rotors for the machine slots
/// - Setting: positioning the installed rotors
/// - Conversion: running a message through the machine
/// - I/O: reading configuration and messages, writing output
#[derive(Debug, Error)]
pub enum Error {
    /// Machine description is malformed or inconsistent
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rotor selection rejected by `insert_rotors`
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Rotor positions rejected by `set_rotors`
    #[error("setting error: {0}")]
    Setting(#[from] SettingError),

    /// Message could not be converted
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A named file could not be opened or created
    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a failure to open `path`.
    pub fn open(path: &Path, source: std::io::Error) -> Self {
        Error::Open {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Configuration errors: alphabet, permutations and machine dimensions.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range bounds are out of order
    #[error("invalid alphabet range {first:?}..={last:?}")]
    InvalidRange { first: char, last: char },

    /// Alphabet has no characters
    #[error("alphabet is empty")]
    EmptyAlphabet,

    /// Same character listed twice in an alphabet
    #[error("duplicate character {0:?} in alphabet")]
    DuplicateAlphabetChar(char),

    /// Slot and pawl counts violate 0 <= pawls < rotors, rotors > 1
    #[error("invalid machine dimensions: {rotors} rotors, {pawls} pawls")]
    InvalidDimensions { rotors: usize, pawls: usize },

    /// Cycle notation could not be parsed
    #[error("malformed cycles {cycles:?}: {reason}")]
    MalformedCycles { cycles: String, reason: String },

    /// A cycle or notch mentions a character the alphabet lacks
    #[error("character {0:?} is not in the alphabet")]
    UnknownChar(char),

    /// A rotor or plugboard was built over a different alphabet
    #[error("{0} uses a different alphabet than the machine")]
    AlphabetMismatch(String),

    /// Two catalog entries share a name
    #[error("rotor {0} is defined twice")]
    DuplicateDefinition(String),

    /// Configuration file could not be parsed
    #[error("{0}")]
    Malformed(String),
}

/// Errors from selecting rotors for the machine slots.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Number of names differs from the slot count
    #[error("expected {expected} rotors, got {actual}")]
    WrongRotorCount { expected: usize, actual: usize },

    /// Name not present in the catalog
    #[error("rotor {0} not found")]
    RotorNotFound(String),

    /// Selected rotating rotors do not match the pawls
    #[error("pawl/rotor mismatch: {pawls} pawls but {moving} moving rotors")]
    PawlMismatch { pawls: usize, moving: usize },

    /// Same rotor selected for two slots
    #[error("duplicate rotor {0}")]
    DuplicateRotor(String),

    /// Leftmost slot does not hold a reflector
    #[error("missing reflector: {0} in slot 0 is not a reflector")]
    MissingReflector(String),

    /// A reflector was selected for some other slot
    #[error("extra reflector {name} in slot {slot}")]
    ExtraReflector { name: String, slot: usize },
}

/// Errors from positioning rotors.
#[derive(Debug, Error)]
pub enum SettingError {
    /// Setting string does not cover every non-reflector slot
    #[error("setting length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Setting character is not in the alphabet
    #[error("setting character {0:?} is not in the alphabet")]
    UnknownChar(char),

    /// Position index beyond the alphabet
    #[error("position {position} out of range for alphabet of size {size}")]
    OutOfRange { position: usize, size: usize },

    /// Reflectors only sit at position 0
    #[error("reflector {0} cannot be set")]
    ReflectorPosition(String),

    /// Nothing installed to set
    #[error("no rotors installed")]
    NoRotors,
}

/// Errors from converting messages.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// `convert` called before `insert_rotors`
    #[error("no rotors installed")]
    NoRotors,

    /// Message character is not in the alphabet
    #[error("character {0:?} is not in the alphabet")]
    UnknownChar(char),

    /// Index beyond the alphabet
    #[error("index {index} out of range for alphabet of size {size}")]
    OutOfRange { index: usize, size: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
