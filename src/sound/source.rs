//! Alert sound sources.
//!
//! The alert is either a short synthesized tone or a user-supplied clip. A
//! clip is read and decoded once when it is loaded so a missing or corrupt
//! file is reported at startup instead of at the first phase boundary.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, Source};

use super::error::SoundError;

/// Frequency of the built-in tone in Hz.
const TONE_HZ: f32 = 880.0;
/// Length of the built-in tone.
const TONE_LENGTH: Duration = Duration::from_millis(250);
const TONE_VOLUME: f32 = 0.25;

/// The sound played at phase boundaries.
#[derive(Clone, PartialEq, Eq)]
pub enum AlertSound {
    /// Built-in synthesized beep.
    Tone,
    /// Encoded audio clip held in memory.
    Clip {
        /// Display name (usually the file name).
        name: String,
        /// Encoded bytes (mp3, wav, flac, ...).
        data: Arc<[u8]>,
    },
}

impl AlertSound {
    /// Loads and validates a clip from disk.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` if the file cannot be read and
    /// `SoundError::DecodeError` if it is not decodable audio.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SoundError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    /// Validates encoded audio bytes and wraps them as a clip.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DecodeError` if the bytes are not decodable audio.
    pub fn from_bytes(
        name: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, SoundError> {
        let name = name.into();
        let data: Arc<[u8]> = data.into();
        Decoder::new(Cursor::new(Arc::clone(&data)))
            .map_err(|e| SoundError::DecodeError(format!("{}: {}", name, e)))?;
        Ok(Self::Clip { name, data })
    }

    /// Returns the display name of the sound.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tone => "tone",
            Self::Clip { name, .. } => name,
        }
    }

    /// Returns a decoder for a clip, or `None` for the tone.
    pub(crate) fn decoder(&self) -> Option<Result<Decoder<Cursor<Arc<[u8]>>>, SoundError>> {
        match self {
            Self::Tone => None,
            Self::Clip { name, data } => Some(
                Decoder::new(Cursor::new(Arc::clone(data)))
                    .map_err(|e| SoundError::DecodeError(format!("{}: {}", name, e))),
            ),
        }
    }
}

impl Default for AlertSound {
    fn default() -> Self {
        Self::Tone
    }
}

impl fmt::Debug for AlertSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tone => f.write_str("Tone"),
            Self::Clip { name, data } => f
                .debug_struct("Clip")
                .field("name", name)
                .field("bytes", &data.len())
                .finish(),
        }
    }
}

/// The built-in beep.
pub(crate) fn tone() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(TONE_HZ)
        .take_duration(TONE_LENGTH)
        .amplify(TONE_VOLUME)
}
