//! One run of the application: load the description, open the streams, then
//! either convert the message stream or round-trip a generated sample.
//!
//! The input is always opened before the output is created, so a missing
//! input file never truncates an existing output file.

use crate::config::Config;
use crate::input_gen::generate_sample;
use crate::machine_config::MachineConfig;
use crate::session::{format_groups, Session};
use enigma_core::{Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Run with `config` and return the finished session.
pub fn run(config: &Config) -> Result<Session> {
    let machine_config = MachineConfig::from_path(&config.config_file)?;
    let machine = machine_config.build()?;
    info!(config = %config.config_file.display(), "machine loaded");

    let input = match config.sample_len {
        Some(_) => None,
        None => Some(open_input(config.input_file.as_deref())?),
    };
    let output = open_output(config.output_file.as_deref())?;
    let mut session = Session::new(machine);

    match input {
        Some(input) => session.process(input, output)?,
        None => run_sample(
            &mut session,
            &machine_config,
            config.seed,
            config.sample_len.unwrap_or_default(),
            output,
        )?,
    }

    if config.print_stats {
        session.stats().print_summary();
    }
    Ok(session)
}

/// Encrypt a generated sample, decrypt it again, and report both.
pub fn run_sample<W: Write>(
    session: &mut Session,
    machine_config: &MachineConfig,
    seed: u64,
    len: usize,
    mut output: W,
) -> Result<()> {
    let sample = generate_sample(machine_config, seed, len)?;

    session.apply_settings(&sample.settings_line)?;
    let cipher = session.process_line(&sample.plaintext)?.unwrap_or_default();
    session.apply_settings(&sample.settings_line)?;
    let decrypted = session.process_line(&cipher)?.unwrap_or_default();
    session.stats_mut().complete();

    let matched = decrypted == format_groups(&sample.plaintext);
    writeln!(output, "Seed: {seed}")?;
    writeln!(output, "{}", sample.settings_line)?;
    writeln!(output, "Plaintext:  {}", format_groups(&sample.plaintext))?;
    writeln!(output, "Ciphertext: {cipher}")?;
    writeln!(output, "Decrypted:  {decrypted}")?;
    writeln!(output, "Round trip: {}", if matched { "PASSED" } else { "FAILED" })?;
    output.flush()?;
    Ok(())
}

/// Open `path` for reading; `None` or `-` is stdin.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).map_err(|e| Error::open(p, e))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(io::stdin())),
    })
}

/// Create `path` for writing; `None` or `-` is stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) if p != Path::new("-") => {
            let file = File::create(p).map_err(|e| Error::open(p, e))?;
            Box::new(BufWriter::new(file))
        }
        _ => Box::new(BufWriter::new(io::stdout())),
    })
}
