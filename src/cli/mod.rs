//! CLI module for the working cycle timer.
//!
//! This module provides the console front end:
//! - `commands`: Command definitions using clap derive
//! - `console`: stdin event source and menu renderer threads
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod console;
pub mod display;

pub use commands::{Cli, Commands};
pub use display::Display;
