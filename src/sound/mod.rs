//! Alert sound playback.
//!
//! This module provides:
//!
//! - The [`AudioPlayer`] interface used by the cycle engine
//! - A rodio-backed player running on its own audio thread
//! - A built-in tone and loadable clips ([`AlertSound`])
//! - Silent and mock players
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  AudioCommand   ┌──────────────────┐
//! │ RodioAudioPlayer │ ──────────────▶ │   audio thread   │
//! │ (Send + Sync)    │  (crossbeam)    │ OutputStream+Sink│
//! └──────────────────┘                 └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use working_cycles::sound::{try_create_player, AlertSound};
//!
//! let player = try_create_player(AlertSound::Tone);
//! player.play_once();
//! player.play_repeated(3);
//! ```

mod error;
mod player;
mod source;

use std::sync::Mutex;

pub use error::SoundError;
pub use player::{try_create_player, RodioAudioPlayer};
pub use source::AlertSound;

/// Plays the alert sound.
///
/// Calls are fire-and-forget: implementations report their own failures
/// through logging and never block the caller for the length of the sound.
pub trait AudioPlayer: Send + Sync {
    /// Plays the alert once.
    fn play_once(&self);

    /// Plays the alert `times` times back to back.
    fn play_repeated(&self, times: u32);
}

/// Player used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudioPlayer;

impl AudioPlayer for SilentAudioPlayer {
    fn play_once(&self) {
        tracing::debug!("Audio unavailable, skipping alert");
    }

    fn play_repeated(&self, times: u32) {
        tracing::debug!(times, "Audio unavailable, skipping repeated alert");
    }
}

/// A call recorded by [`MockAudioPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCall {
    Once,
    Repeated(u32),
}

/// Mock audio player for testing.
#[derive(Debug, Default)]
pub struct MockAudioPlayer {
    calls: Mutex<Vec<PlayCall>>,
}

impl MockAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<PlayCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl AudioPlayer for MockAudioPlayer {
    fn play_once(&self) {
        self.calls.lock().unwrap().push(PlayCall::Once);
    }

    fn play_repeated(&self, times: u32) {
        self.calls.lock().unwrap().push(PlayCall::Repeated(times));
    }
}
