//! Machine description files.
//!
//! A description names the alphabet, the slot and pawl counts, and every
//! rotor the machine can be loaded with:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!           (RX) (SZ) (TV)
//! ```
//!
//! # Format
//! - The first non-blank line is the alphabet: either every character in
//!   order, or a range written `A-Z`.
//! - Everything after it is split on whitespace. Two integers come first:
//!   slots, then pawls.
//! - Each rotor is a name, a type (`M` plus notch characters, `N` for fixed,
//!   `R` for a reflector), then every following token that starts with `(`.
//!   Cycles may therefore continue over as many lines as needed.
//! - A bare `M` is a moving rotor with no notches: it turns under its own
//!   pawl but never carries its left neighbour. Any other type token is
//!   rejected.
//!
//! Names are upper-cased, matching how settings lines are read.

use enigma_core::error::{ConfigError, Result};
use enigma_core::{Alphabet, Error, Machine, RotorSpec, RotorSpecKind};
use std::iter::Peekable;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Parsed machine description.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub alphabet: Arc<Alphabet>,
    pub num_rotors: usize,
    pub num_pawls: usize,
    pub rotors: Vec<RotorSpec>,
}

impl MachineConfig {
    /// Read and parse the description at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::open(path, e))?;
        Self::parse(&text)
    }

    /// Parse a description from text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
        let alphabet_line = lines
            .next()
            .ok_or_else(|| malformed("configuration is empty"))?;
        let alphabet = Arc::new(parse_alphabet(alphabet_line.trim())?);

        let rest: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
        let mut tokens = rest.into_iter().peekable();

        let num_rotors = parse_count(tokens.next(), "rotor count")?;
        let num_pawls = parse_count(tokens.next(), "pawl count")?;

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            rotors.push(parse_rotor(name, &mut tokens)?);
        }

        debug!(
            alphabet = %alphabet,
            rotors = num_rotors,
            pawls = num_pawls,
            available = rotors.len(),
            "configuration parsed"
        );

        Ok(Self {
            alphabet,
            num_rotors,
            num_pawls,
            rotors,
        })
    }

    /// Build every rotor and assemble a machine with no rotors inserted.
    pub fn build(&self) -> Result<Machine> {
        let rotors = self
            .rotors
            .iter()
            .map(|spec| spec.build(&self.alphabet))
            .collect::<Result<Vec<_>>>()?;
        Machine::new(Arc::clone(&self.alphabet), self.num_rotors, self.num_pawls, rotors)
    }
}

fn malformed(reason: impl Into<String>) -> ConfigError {
    ConfigError::Malformed(reason.into())
}

fn parse_alphabet(line: &str) -> Result<Alphabet> {
    let chars: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    match chars.as_slice() {
        [first, '-', last] => Alphabet::range(*first, *last),
        _ => Alphabet::new(chars),
    }
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| malformed(format!("configuration truncated: missing {what}")))?;
    token
        .parse()
        .map_err(|_| malformed(format!("invalid {what}: {token:?}")).into())
}

fn parse_rotor<'a, I>(name: &str, tokens: &mut Peekable<I>) -> Result<RotorSpec>
where
    I: Iterator<Item = &'a str>,
{
    let name = name.to_uppercase();
    let kind_token = tokens
        .next()
        .ok_or_else(|| malformed(format!("bad rotor description: {name} has no type")))?;

    let mut kind_chars = kind_token.chars();
    let kind = match (kind_chars.next(), kind_chars.as_str()) {
        (Some('M'), notches) => RotorSpecKind::Moving {
            notches: notches.to_string(),
        },
        (Some('N'), "") => RotorSpecKind::Fixed,
        (Some('R'), "") => RotorSpecKind::Reflecting,
        _ => {
            return Err(malformed(format!("bad rotor description: {name} has unknown type {kind_token:?}")).into());
        }
    };

    let mut cycles = Vec::new();
    while let Some(token) = tokens.next_if(|t| t.starts_with('(')) {
        cycles.push(token);
    }

    Ok(RotorSpec {
        name,
        kind,
        cycles: cycles.join(" "),
    })
}

/// The standard naval description: eight rotors, two thin fixed rotors and
/// two thin reflectors over `A-Z`, five slots and three pawls.
pub const STANDARD: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
5 3
I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
V MZ      (AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)
VI MZM    (AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)
VII MZM   (ANOCUPWYEQTH) (BSKXVZ) (DJRMFI)
VIII MZM  (AFLSETWUNDHOZVICQ) (BKJ) (GYMRP)
Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
          (RX) (SZ) (TV)
C R       (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW)
          (QZ) (SX) (UY)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard() {
        let config = MachineConfig::parse(STANDARD).unwrap();
        assert_eq!(config.alphabet.size(), 26);
        assert_eq!(config.num_rotors, 5);
        assert_eq!(config.num_pawls, 3);
        assert_eq!(config.rotors.len(), 12);

        let names: Vec<&str> = config.rotors.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "BETA", "GAMMA", "B", "C"]
        );
        assert_eq!(
            config.rotors[5].kind,
            RotorSpecKind::Moving {
                notches: "ZM".to_string()
            }
        );
        assert_eq!(config.rotors[8].kind, RotorSpecKind::Fixed);
        assert_eq!(config.rotors[10].kind, RotorSpecKind::Reflecting);
    }

    #[test]
    fn test_multiline_reflector_cycles() {
        let config = MachineConfig::parse(STANDARD).unwrap();
        let machine = config.build().unwrap();
        let b = config.rotors[10].build(&config.alphabet).unwrap();
        assert!(b.permutation().derangement());
        assert_eq!(machine.num_rotors(), 5);
    }

    #[test]
    fn test_range_alphabet() {
        let config = MachineConfig::parse("a-e\n2 1\nr R (ab) (cd)\nm Ma (abcde)\n").unwrap();
        assert_eq!(config.alphabet.to_string(), "abcde");
        assert_eq!(config.rotors[0].name, "R");
        assert_eq!(config.rotors[1].name, "M");
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_leading_blank_lines_and_tabs() {
        let text = "\n\n  ABCD \n\t2\t1\nR R\t(AB)\t(CD)\nX MA (ABCD)\n";
        let config = MachineConfig::parse(text).unwrap();
        assert_eq!(config.alphabet.size(), 4);
        assert_eq!(config.rotors.len(), 2);
    }

    #[test]
    fn test_rotor_without_cycles_is_identity() {
        let config = MachineConfig::parse("ABC\n2 1\nR R (AB)\nX MA\n").unwrap();
        assert_eq!(config.rotors[1].cycles, "");
        assert_eq!(
            config.rotors[1].kind,
            RotorSpecKind::Moving {
                notches: "A".to_string()
            }
        );
    }

    #[test]
    fn test_bare_moving_type_has_no_notches() {
        let config = MachineConfig::parse("ABC\n3 2\nR R (AB)\nX M (ABC)\nY MB (AC)\n").unwrap();
        assert_eq!(
            config.rotors[1].kind,
            RotorSpecKind::Moving {
                notches: String::new()
            }
        );

        let mut machine = config.build().unwrap();
        machine.insert_rotors(&["R", "Y", "X"]).unwrap();
        machine.set_rotors("AA").unwrap();
        machine.convert("AAAA").unwrap();
        assert!(!machine.slots()[2].at_notch());
        assert_eq!(machine.settings(), "AB");
    }

    #[test]
    fn test_malformed_configurations() {
        let cases = [
            "",
            "   \n\n",
            "ABC\n",
            "ABC\n5\n",
            "ABC\nfive 3\n",
            "ABC\n5 -1\n",
            "ABC\n2 1\nR",
            "ABC\n2 1\nR Q (AB)",
            "ABC\n2 1\nR NX (AB)",
        ];
        for text in cases {
            let result = MachineConfig::parse(text);
            assert!(
                matches!(result, Err(Error::Config(ConfigError::Malformed(_)))),
                "{text:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn test_invalid_content_surfaces_core_errors() {
        assert!(matches!(
            MachineConfig::parse("ABCA\n2 1\n"),
            Err(Error::Config(ConfigError::DuplicateAlphabetChar('A')))
        ));
        assert!(matches!(
            MachineConfig::parse("Z-A\n2 1\n"),
            Err(Error::Config(ConfigError::InvalidRange { .. }))
        ));

        let bad_cycle = MachineConfig::parse("ABC\n2 1\nR R (AX)\nM MA (ABC)\n").unwrap();
        assert!(matches!(
            bad_cycle.build(),
            Err(Error::Config(ConfigError::UnknownChar('X')))
        ));

        let bad_dims = MachineConfig::parse("ABC\n2 2\nR R (AB)\nM MA (ABC)\n").unwrap();
        assert!(matches!(
            bad_dims.build(),
            Err(Error::Config(ConfigError::InvalidDimensions { rotors: 2, pawls: 2 }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = MachineConfig::from_path(Path::new("/nonexistent/enigma.conf"));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().starts_with("could not open /nonexistent/enigma.conf"));
    }
}
