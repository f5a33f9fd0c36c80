//! Session counters.
//!
//! Tracks what a run did: how many settings lines were applied, how many
//! message lines and characters went through the machine, and how long it
//! took. Updated explicitly by the session as each line is handled.
//!
//! # Thread Safety
//!
//! `Stats` is plain data owned by one session; nothing here is shared.

use std::time::{Duration, Instant};

/// Counters for one run over a message stream.
#[derive(Debug, Clone)]
pub struct Stats {
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Settings lines applied
    pub settings_applied: u64,

    /// Message lines converted (blank lines excluded)
    pub messages_converted: u64,

    /// Characters converted, i.e. keystrokes
    pub chars_converted: u64,

    /// Blank lines passed through
    pub blank_lines: u64,
}

impl Stats {
    /// Create new stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            settings_applied: 0,
            messages_converted: 0,
            chars_converted: 0,
            blank_lines: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Keystrokes per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.chars_converted as f64 / secs
        }
    }

    /// Average characters per converted message.
    pub fn mean_message_len(&self) -> f64 {
        if self.messages_converted == 0 {
            0.0
        } else {
            self.chars_converted as f64 / self.messages_converted as f64
        }
    }

    /// Print a human-readable summary to stderr, leaving stdout to the
    /// converted messages.
    pub fn print_summary(&self) {
        eprintln!("=== Session Summary ===");
        eprintln!("Duration: {} ms", self.duration().as_millis());
        eprintln!("Settings applied: {}", self.settings_applied);
        eprintln!("Messages: {}", self.messages_converted);
        eprintln!("Characters: {}", self.chars_converted);
        eprintln!("Mean message length: {:.1}", self.mean_message_len());
        eprintln!("Blank lines: {}", self.blank_lines);
        eprintln!("Throughput: {:.0} chars/s", self.throughput());
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}
