//! Sound player implementation using rodio.
//!
//! rodio's output stream cannot move between threads, so the player owns a
//! dedicated audio thread that holds the stream and receives play commands
//! over a crossbeam channel. The handle itself is `Send + Sync` and can be
//! shared with the phase loop.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{tone, AlertSound};
use super::{AudioPlayer, SilentAudioPlayer};

#[derive(Debug)]
enum AudioCommand {
    Play { times: u32 },
    Shutdown,
}

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioAudioPlayer {
    commands: Sender<AudioCommand>,
    thread: Mutex<Option<JoinHandle<()>>>,
    sound_name: String,
}

impl RodioAudioPlayer {
    /// Starts the audio thread and opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available, or `SoundError::StreamError` if the thread cannot start.
    pub fn spawn(sound: AlertSound) -> Result<Self, SoundError> {
        let (commands, rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let sound_name = sound.name().to_string();

        let thread = std::thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
                        return;
                    }
                };
                debug!("Audio output stream initialized");
                audio_loop(&handle, &sound, rx);
            })
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        ready_rx.recv().map_err(|_| {
            SoundError::StreamError("audio thread exited during startup".to_string())
        })??;

        Ok(Self {
            commands,
            thread: Mutex::new(Some(thread)),
            sound_name,
        })
    }

    fn send(&self, times: u32) {
        if let Err(e) = self.commands.send(AudioCommand::Play { times }) {
            warn!("{}", SoundError::PlaybackError(e.to_string()));
        }
    }
}

impl AudioPlayer for RodioAudioPlayer {
    fn play_once(&self) {
        self.send(1);
    }

    fn play_repeated(&self, times: u32) {
        if times > 0 {
            self.send(times);
        }
    }
}

impl Drop for RodioAudioPlayer {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        let thread = self
            .thread
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(thread) = thread {
            if thread.join().is_err() {
                warn!("audio thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for RodioAudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioPlayer")
            .field("sound", &self.sound_name)
            .finish_non_exhaustive()
    }
}

fn audio_loop(handle: &OutputStreamHandle, sound: &AlertSound, rx: Receiver<AudioCommand>) {
    for command in rx {
        match command {
            AudioCommand::Play { times } => {
                if let Err(e) = play(handle, sound, times) {
                    warn!(
                        sound = sound.name(),
                        "failed to play alert: {} ({})",
                        e,
                        e.suggestion()
                    );
                }
            }
            AudioCommand::Shutdown => break,
        }
    }
    debug!("Audio thread stopped");
}

fn play(handle: &OutputStreamHandle, sound: &AlertSound, times: u32) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    for _ in 0..times {
        match sound.decoder() {
            None => sink.append(tone()),
            Some(decoder) => sink.append(decoder?),
        }
    }
    sink.detach();

    debug!(times, "Sound playback started (detached)");
    Ok(())
}

/// Creates a player, falling back to silence if audio is unavailable.
///
/// A missing output device is not an error for the application: a warning is
/// logged and a [`SilentAudioPlayer`] is returned instead.
#[must_use]
pub fn try_create_player(sound: AlertSound) -> Arc<dyn AudioPlayer> {
    match RodioAudioPlayer::spawn(sound) {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!("{}", silent_fallback_message(&e));
            Arc::new(SilentAudioPlayer)
        }
    }
}

fn silent_fallback_message(error: &SoundError) -> String {
    format!(
        "Audio not available, alerts will be silent: {} ({})",
        error,
        error.suggestion()
    )
}
