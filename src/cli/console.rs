//! Console event source and menu renderer.
//!
//! Both run on plain threads: reading stdin blocks, and the renderer is fed
//! from the control surface through a crossbeam channel the same way a tray
//! icon would be.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::display::Display;
use crate::control::{Affordance, AffordanceSink, ControlEvent, MenuState, ParseEventError};

/// Reads commands from `input`, one per line, and forwards them as events.
///
/// Returns when the input ends or the receiving side is gone.
pub fn forward_commands<R: BufRead>(input: R, tx: &mpsc::Sender<ControlEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to read command: {}", e);
                break;
            }
        };
        match line.parse::<ControlEvent>() {
            Ok(event) => {
                if tx.blocking_send(event).is_err() {
                    debug!("event loop gone, stop reading commands");
                    break;
                }
            }
            Err(ParseEventError::Empty) => {}
            Err(e) => Display::show_unknown_command(&e),
        }
    }
}

/// Spawns a thread that turns stdin lines into control events.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_source(tx: mpsc::Sender<ControlEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            forward_commands(io::stdin().lock(), &tx);
            debug!("stdin closed");
        })
}

/// Applies menu updates and prints the menu after each burst of updates.
///
/// Returns the final menu once every sender is dropped.
pub fn render_menu(rx: Receiver<Affordance>) -> MenuState {
    let mut menu = MenuState::new();
    while let Ok(update) = rx.recv() {
        menu.apply(update);
        for update in rx.try_iter() {
            menu.apply(update);
        }
        Display::show_menu(&menu);
    }
    menu
}

/// Spawns the menu renderer thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_menu_renderer(rx: Receiver<Affordance>) -> io::Result<JoinHandle<MenuState>> {
    thread::Builder::new()
        .name("menu".to_string())
        .spawn(move || render_menu(rx))
}
