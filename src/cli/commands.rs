//! Command definitions for the working cycle timer.
//!
//! Uses clap derive macro for argument parsing. Phase durations are fixed
//! and deliberately not exposed here.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// 60-60-30 working cycle timer
#[derive(Parser, Debug)]
#[command(
    name = "working-cycles",
    version,
    about = "60-60-30 working cycle timer",
    long_about = "Runs four 25 minute work periods separated by 5 minute breaks, \
                  followed by a 30 minute break, with desktop notifications at \
                  every phase boundary.\n\
                  Control it by typing commands (start, stop, restart, audio on|off, \
                  auto on|off, quit).",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (runs the timer when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Alert sound file (mp3, wav, flac, ogg) used instead of the built-in tone
    #[arg(long, value_name = "FILE")]
    pub sound: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tests
// ============================================================================
