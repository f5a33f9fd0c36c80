//! Sample traffic generation for demonstration runs.
//!
//! When `--sample` is given, we make up a valid settings line and a random
//! plaintext for the loaded machine description, so the whole pipeline can
//! be exercised without writing an input file.
//!
//! # Design
//!
//! The generated settings line:
//! - picks a random reflector
//! - fills the remaining slots with distinct fixed rotors on the left and
//!   exactly `num_pawls` distinct moving rotors on the right
//! - picks a random starting position per slot
//! - plugs a random number of disjoint pairs (at most ten)
//!
//! All randomness comes from a seeded ChaCha8 RNG, so a seed reproduces the
//! same sample.

use crate::machine_config::MachineConfig;
use enigma_core::error::{ConfigError, Result};
use enigma_core::{RotorSpec, RotorSpecKind};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Most plugboard pairs a sample will use.
const MAX_PLUG_PAIRS: usize = 10;

/// A generated settings line and plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub settings_line: String,
    pub plaintext: String,
}

/// Generate a sample for `config` with a plaintext of `len` characters.
///
/// # Errors
/// `ConfigError::Malformed` if the description does not have enough rotors
/// of each kind to fill the machine.
pub fn generate_sample(config: &MachineConfig, seed: u64, len: usize) -> Result<Sample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let reflectors = of_kind(config, |k| matches!(k, RotorSpecKind::Reflecting));
    let fixed = of_kind(config, |k| matches!(k, RotorSpecKind::Fixed));
    let moving = of_kind(config, |k| matches!(k, RotorSpecKind::Moving { .. }));

    let num_fixed = config.num_rotors - 1 - config.num_pawls;
    let reflector = reflectors
        .choose(&mut rng)
        .ok_or_else(|| shortage("reflector", 1, 0))?;
    if fixed.len() < num_fixed {
        return Err(shortage("fixed rotor", num_fixed, fixed.len()).into());
    }
    if moving.len() < config.num_pawls {
        return Err(shortage("moving rotor", config.num_pawls, moving.len()).into());
    }

    let mut names = vec![reflector.name.as_str()];
    names.extend(fixed.choose_multiple(&mut rng, num_fixed).map(|r| r.name.as_str()));
    names.extend(moving.choose_multiple(&mut rng, config.num_pawls).map(|r| r.name.as_str()));

    let alphabet: Vec<char> = config.alphabet.chars().collect();
    let setting: String = (1..config.num_rotors)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    let mut shuffled = alphabet.clone();
    shuffled.shuffle(&mut rng);
    let pairs = rng.gen_range(0..=MAX_PLUG_PAIRS.min(alphabet.len() / 2));
    let plugboard: Vec<String> = shuffled
        .chunks_exact(2)
        .take(pairs)
        .map(|pair| format!("({}{})", pair[0], pair[1]))
        .collect();

    let mut settings_line = format!("* {} {}", names.join(" "), setting);
    if !plugboard.is_empty() {
        settings_line.push(' ');
        settings_line.push_str(&plugboard.join(" "));
    }

    let plaintext = (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    Ok(Sample {
        settings_line,
        plaintext,
    })
}

fn of_kind<'a>(config: &'a MachineConfig, wanted: fn(&RotorSpecKind) -> bool) -> Vec<&'a RotorSpec> {
    config.rotors.iter().filter(|r| wanted(&r.kind)).collect()
}

fn shortage(what: &str, needed: usize, available: usize) -> ConfigError {
    ConfigError::Malformed(format!(
        "cannot generate a sample: need {needed} {what}(s), configuration has {available}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine_config::STANDARD;
    use crate::session::Session;
    use enigma_core::Error;

    fn standard() -> MachineConfig {
        MachineConfig::parse(STANDARD).unwrap()
    }

    #[test]
    fn test_generate_sample() {
        let sample = generate_sample(&standard(), 42, 100).unwrap();
        assert_eq!(sample.plaintext.len(), 100);
        assert!(sample.plaintext.chars().all(|c| c.is_ascii_uppercase()));
        assert!(sample.settings_line.starts_with("* "));
    }

    #[test]
    fn test_determinism() {
        let a = generate_sample(&standard(), 12345, 500).unwrap();
        let b = generate_sample(&standard(), 12345, 500).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds() {
        let a = generate_sample(&standard(), 1, 200).unwrap();
        let b = generate_sample(&standard(), 2, 200).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sample_settings_are_accepted() {
        for seed in 0..50 {
            let sample = generate_sample(&standard(), seed, 10).unwrap();
            let mut session = Session::new(standard().build().unwrap());
            session
                .apply_settings(&sample.settings_line)
                .unwrap_or_else(|e| panic!("seed {seed}: {:?} rejected: {e}", sample.settings_line));
        }
    }

    #[test]
    fn test_various_sizes() {
        for len in [0, 1, 5, 1000] {
            let sample = generate_sample(&standard(), 999, len).unwrap();
            assert_eq!(sample.plaintext.chars().count(), len);
        }
    }

    #[test]
    fn test_not_enough_rotors() {
        let config = MachineConfig::parse("ABCD\n3 2\nR R (AB) (CD)\nX MA (ABCD)\n").unwrap();
        let result = generate_sample(&config, 7, 10);
        assert!(matches!(result, Err(Error::Config(ConfigError::Malformed(_)))));
    }
}
