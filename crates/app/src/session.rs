//! Message stream processing.
//!
//! Input is a sequence of lines of three kinds:
//! - **Settings**: `* B BETA III IV I AXLE (HQ) (EX)`: rotor names
//!   (reflector first), one setting character per non-reflector slot, then
//!   optional plugboard cycles. A settings line without cycles clears the
//!   plugboard.
//! - **Blank**: echoed as a blank output line.
//! - **Message**: converted and written in groups of five characters.
//!
//! Rotor positions carry over from one message line to the next until the
//! next settings line.

use crate::stats::Stats;
use enigma_core::error::{AssemblyError, Result, SettingError};
use enigma_core::Machine;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Characters per output group.
pub const GROUP_SIZE: usize = 5;

/// A machine plus the counters for the stream it is working through.
#[derive(Debug)]
pub struct Session {
    machine: Machine,
    stats: Stats,
}

impl Session {
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            stats: Stats::new(),
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    /// Process every line of `input`, writing results to `output`.
    ///
    /// Stops at the first error; lines already written stay written.
    pub fn process<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            if let Some(out) = self.process_line(&line?)? {
                writeln!(output, "{out}")?;
            }
        }
        output.flush()?;
        self.stats.complete();
        info!(
            messages = self.stats.messages_converted,
            chars = self.stats.chars_converted,
            "stream processed"
        );
        Ok(())
    }

    /// Handle one input line. Returns the line to emit, if any.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        if is_settings_line(line) {
            self.apply_settings(line)?;
            return Ok(None);
        }
        if line.trim().is_empty() {
            self.stats.blank_lines += 1;
            return Ok(Some(String::new()));
        }

        let converted = self.machine.convert(line)?;
        self.stats.messages_converted += 1;
        self.stats.chars_converted += converted.chars().count() as u64;
        Ok(Some(format_groups(&converted)))
    }

    /// Apply a `*` settings line: insert rotors, set positions, replace the
    /// plugboard. Either the whole line takes effect or none of it does.
    pub fn apply_settings(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace().skip(1);
        let num_rotors = self.machine.num_rotors();

        let names: Vec<String> = tokens
            .by_ref()
            .take(num_rotors)
            .map(str::to_uppercase)
            .collect();
        if names.len() != num_rotors {
            return Err(AssemblyError::WrongRotorCount {
                expected: num_rotors,
                actual: names.len(),
            }
            .into());
        }

        let setting = tokens.next().ok_or(SettingError::LengthMismatch {
            expected: num_rotors - 1,
            actual: 0,
        })?;
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        // Stage on a copy so a rejected line leaves the live machine untouched
        let mut staged = self.machine.clone();
        staged.insert_rotors(&names)?;
        staged.set_rotors(setting)?;
        if plugboard.is_empty() {
            staged.set_plugboard(None)?;
        } else {
            staged.set_plugboard_cycles(&plugboard)?;
        }
        self.machine = staged;

        self.stats.settings_applied += 1;
        debug!(rotors = ?names, setting, plugboard = %plugboard, "settings applied");
        Ok(())
    }
}

/// Whether `line` is a settings line, i.e. its first token is `*`.
pub fn is_settings_line(line: &str) -> bool {
    line.split_whitespace().next() == Some("*")
}

/// Split `msg` into groups of five characters separated by single spaces.
/// The last group may be shorter.
pub fn format_groups(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len() + msg.len() / GROUP_SIZE);
    for (i, ch) in msg.chars().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
