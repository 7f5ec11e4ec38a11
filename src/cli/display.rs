//! Display utilities for the console front end.
//!
//! This module provides formatted output for:
//! - The startup banner
//! - The current menu
//! - Error messages

use std::time::Duration;

use crate::control::{MenuState, ParseEventError};
use crate::types::CycleConfig;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for console output.
pub struct Display;

impl Display {
    /// Shows the cadence and the available commands.
    pub fn show_banner(config: &CycleConfig) {
        println!("60-60-30 Working cycles");
        println!("─────────────────────────────");
        println!("{}", Self::describe_cycle(config));
        println!("Commands: start, stop, restart, audio on|off, auto on|off, quit");
    }

    /// Shows the visible menu items.
    pub fn show_menu(menu: &MenuState) {
        println!("Menu:");
        print!("{}", menu);
    }

    /// Shows a hint for an unrecognized command.
    pub fn show_unknown_command(error: &ParseEventError) {
        eprintln!("{} (try: start, stop, restart, audio on|off, auto on|off, quit)", error);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// One-line summary of a cycle.
    pub fn describe_cycle(config: &CycleConfig) -> String {
        format!(
            "{} x {} work, {} breaks, then {} rest",
            config.work_periods,
            Self::format_duration(config.work),
            Self::format_duration(config.short_break),
            Self::format_duration(config.final_break),
        )
    }

    /// Formats a duration as whole minutes, or seconds below one minute.
    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            format!("{} min", secs / 60)
        } else {
            format!("{} s", secs)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
