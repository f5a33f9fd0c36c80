//! Command-line configuration for the enigma application.
//!
//! Handles parsing command-line arguments: a machine description file,
//! optional input and output files, and a few switches.
//!
//! # Philosophy
//!
//! Plain invocation behaves like a filter: messages on stdin, converted
//! messages on stdout, diagnostics on stderr. `--sample` needs no input at
//! all and prints its seed so the run can be repeated.

use std::path::PathBuf;

/// Default plaintext length for `--sample` without a number.
pub const DEFAULT_SAMPLE_LEN: usize = 200;

/// Complete configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // === Files ===
    /// Machine description file
    pub config_file: PathBuf,

    /// Message file (None = stdin)
    pub input_file: Option<PathBuf>,

    /// Output file (None = stdout)
    pub output_file: Option<PathBuf>,

    // === Sample mode ===
    /// Generate and round-trip a sample of this many characters instead of
    /// reading messages
    pub sample_len: Option<usize>,

    /// Random seed for sample generation
    pub seed: u64,

    // === Behavior ===
    /// Whether to print session counters to stderr
    pub print_stats: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// Positional arguments are, in order: description file, input file,
    /// output file. If `--seed` is absent, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut positional: Vec<PathBuf> = Vec::new();
        let mut sample_len: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut print_stats = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--sample" => {
                    // Length is optional: take the next argument only if it is a number
                    match args.get(i + 1).and_then(|a| a.parse().ok()) {
                        Some(len) => {
                            sample_len = Some(len);
                            i += 1;
                        }
                        None => sample_len = Some(DEFAULT_SAMPLE_LEN),
                    }
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--stats" => {
                    print_stats = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') && arg.len() > 1 => {
                    return Err(format!("unknown argument: {arg}"));
                }
                arg => positional.push(PathBuf::from(arg)),
            }
            i += 1;
        }

        if positional.is_empty() || positional.len() > 3 {
            return Err("expected 1, 2, or 3 file arguments: CONFIG [INPUT] [OUTPUT]".to_string());
        }

        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut files = positional.into_iter();
        Ok(Config {
            config_file: files.next().unwrap_or_default(),
            input_file: files.next(),
            output_file: files.next(),
            sample_len,
            seed,
            print_stats,
        })
    }
}

fn print_help() {
    println!("enigma: rotor cipher machine simulator");
    println!();
    println!("USAGE:");
    println!("    enigma <CONFIG> [INPUT] [OUTPUT] [OPTIONS]");
    println!();
    println!("ARGS:");
    println!("    <CONFIG>          Machine description file");
    println!("    [INPUT]           Messages to convert (default: stdin)");
    println!("    [OUTPUT]          Converted messages (default: stdout)");
    println!();
    println!("OPTIONS:");
    println!("    --sample [N]      Generate N random letters (default: {DEFAULT_SAMPLE_LEN}), encrypt and decrypt them");
    println!("    --seed <N>        Random seed for --sample");
    println!("    --stats           Print session counters to stderr");
    println!("    --help, -h        Print this help");
    println!();
    println!("INPUT FORMAT:");
    println!("    * B BETA III IV I AXLE (HQ) (EX)   settings: reflector first, positions, plugboard");
    println!("    FROM his shoulder Hiawatha         message: converted in groups of five");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG          Log filter, e.g. RUST_LOG=debug (default: warn)");
    println!();
}
