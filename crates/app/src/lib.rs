//! enigma-app: the command-line layer around `enigma-core`
//!
//! - `config`: command-line arguments
//! - `machine_config`: machine description files
//! - `session`: settings lines, message lines, five-letter groups
//! - `input_gen`: seeded sample traffic
//! - `stats`: session counters
//! - `runner`: one run from description file to output

pub mod config;
pub mod input_gen;
pub mod machine_config;
pub mod runner;
pub mod session;
pub mod stats;
