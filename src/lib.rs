//! Working Cycles Library
//!
//! This library provides the core functionality of the 60-60-30 working
//! cycle timer. It includes:
//! - Cycle engine running the work/break phase sequence
//! - Control surface serializing user events against the engine
//! - Desktop notifications at phase boundaries
//! - Sound playback for the audible signal
//! - Console front end and CLI parsing
//! - Type definitions for configuration and state

pub mod cli;
pub mod control;
pub mod cycle;
pub mod notification;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ConfigError, CycleConfig, EngineMode, EngineState, Phase, PhaseKind, RunId, Settings,
    FINAL_BREAK_DURATION_MIN, NUM_OF_WORK_PERIODS, SHORT_BREAK_DURATION_MIN, WORK_DURATION_MIN,
};

// Re-export engine and control types
pub use control::{Affordance, AffordanceSink, ButtonId, ControlEvent, ControlSurface, MenuState};
pub use cycle::{CancelHandle, CycleEngine, CycleEvent, RunOutcome};

// Re-export notification types
pub use notification::{DesktopNotifier, MockNotifier, Notice, NotificationError, Notifier};

// Re-export sound types
pub use sound::{
    try_create_player, AlertSound, AudioPlayer, MockAudioPlayer, SilentAudioPlayer, SoundError,
};
