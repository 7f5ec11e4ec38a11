//! Core data types for the working cycle timer.
//!
//! This module defines the data structures used for:
//! - Phase kinds and the generated phase sequence
//! - Cycle configuration with validation
//! - Shared engine state (mode and user settings)

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of work periods in one cycle.
pub const NUM_OF_WORK_PERIODS: u32 = 4;
/// Work period length in minutes.
pub const WORK_DURATION_MIN: u64 = 25;
/// Short break length in minutes.
pub const SHORT_BREAK_DURATION_MIN: u64 = 5;
/// Final (long) break length in minutes.
pub const FINAL_BREAK_DURATION_MIN: u64 = 30;

// ============================================================================
// PhaseKind
// ============================================================================

/// The kind of a timed segment in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Focused work period
    Work,
    /// Short break between work periods
    ShortBreak,
    /// Long break closing the cycle
    FinalBreak,
}

impl PhaseKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::ShortBreak => "short_break",
            PhaseKind::FinalBreak => "final_break",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Phase
// ============================================================================

/// One element of the cycle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Kind of the phase
    pub kind: PhaseKind,
    /// 1-based position in the current run
    pub ordinal: u32,
    /// How long the phase lasts
    pub duration: Duration,
}

// ============================================================================
// ConfigError
// ============================================================================

/// Reasons a [`CycleConfig`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("work period count must be at least 1")]
    NoWorkPeriods,

    #[error("{0} duration must be non-zero")]
    ZeroDuration(PhaseKind),
}

// ============================================================================
// CycleConfig
// ============================================================================

/// Timing configuration for a cycle.
///
/// The application always runs with [`CycleConfig::default`]; the builder
/// methods exist so tests can shorten the durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    /// Number of work periods before the final break
    pub work_periods: u32,
    /// Work period duration
    pub work: Duration,
    /// Short break duration
    pub short_break: Duration,
    /// Final break duration
    pub final_break: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            work_periods: NUM_OF_WORK_PERIODS,
            work: Duration::from_secs(WORK_DURATION_MIN * 60),
            short_break: Duration::from_secs(SHORT_BREAK_DURATION_MIN * 60),
            final_break: Duration::from_secs(FINAL_BREAK_DURATION_MIN * 60),
        }
    }
}

impl CycleConfig {
    /// Sets the number of work periods.
    pub fn with_work_periods(mut self, work_periods: u32) -> Self {
        self.work_periods = work_periods;
        self
    }

    /// Sets every phase duration to the same value.
    pub fn with_uniform_duration(mut self, duration: Duration) -> Self {
        self.work = duration;
        self.short_break = duration;
        self.final_break = duration;
        self
    }

    /// Sets the work duration.
    pub fn with_work(mut self, duration: Duration) -> Self {
        self.work = duration;
        self
    }

    /// Sets the short break duration.
    pub fn with_short_break(mut self, duration: Duration) -> Self {
        self.short_break = duration;
        self
    }

    /// Sets the final break duration.
    pub fn with_final_break(mut self, duration: Duration) -> Self {
        self.final_break = duration;
        self
    }

    /// Validates the configuration.
    ///
    /// Rejects a cycle without work periods and zero-length phases.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_periods < 1 {
            return Err(ConfigError::NoWorkPeriods);
        }
        for kind in [PhaseKind::Work, PhaseKind::ShortBreak, PhaseKind::FinalBreak] {
            if self.duration_of(kind).is_zero() {
                return Err(ConfigError::ZeroDuration(kind));
            }
        }
        Ok(())
    }

    /// Returns the configured duration for a phase kind.
    pub fn duration_of(&self, kind: PhaseKind) -> Duration {
        match kind {
            PhaseKind::Work => self.work,
            PhaseKind::ShortBreak => self.short_break,
            PhaseKind::FinalBreak => self.final_break,
        }
    }

    /// Builds the phase sequence for one run.
    ///
    /// Odd ordinals are work periods, even ordinals short breaks, and the
    /// last of the `2 * work_periods` entries is the final break.
    pub fn sequence(&self) -> Vec<Phase> {
        let total = self.work_periods * 2;
        (1..=total)
            .map(|ordinal| {
                let kind = if ordinal == total {
                    PhaseKind::FinalBreak
                } else if ordinal % 2 == 0 {
                    PhaseKind::ShortBreak
                } else {
                    PhaseKind::Work
                };
                Phase {
                    kind,
                    ordinal,
                    duration: self.duration_of(kind),
                }
            })
            .collect()
    }
}

// ============================================================================
// EngineMode
// ============================================================================

/// Whether a cycle run is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// No run is active
    #[default]
    Idle,
    /// A run is active
    Running,
}

impl EngineMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Idle => "idle",
            EngineMode::Running => "running",
        }
    }
}

/// Identifier of a single cycle run.
pub type RunId = u64;

// ============================================================================
// Settings
// ============================================================================

/// User-toggled settings, both off at process start.
#[derive(Debug, Default)]
pub struct Settings {
    audio_enabled: AtomicBool,
    auto_restart_enabled: AtomicBool,
}

impl Settings {
    /// Returns true if the alert sound should play at phase boundaries.
    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::SeqCst)
    }

    /// Enables or disables the alert sound.
    pub fn set_audio_enabled(&self, enabled: bool) {
        self.audio_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Returns true if a finished cycle should start over.
    pub fn auto_restart_enabled(&self) -> bool {
        self.auto_restart_enabled.load(Ordering::SeqCst)
    }

    /// Enables or disables auto-restart.
    pub fn set_auto_restart_enabled(&self, enabled: bool) {
        self.auto_restart_enabled.store(enabled, Ordering::SeqCst);
    }
}

// ============================================================================
// EngineState
// ============================================================================

#[derive(Debug, Default)]
struct RunSlot {
    mode: EngineMode,
    current: RunId,
}

/// Process-wide state shared between the control surface and the phase loop.
///
/// The control surface is the only writer of the mode and the settings. The
/// phase loop reads settings and may flip the mode back to idle only for the
/// run it belongs to.
#[derive(Debug, Default)]
pub struct EngineState {
    settings: Settings,
    slot: Mutex<RunSlot>,
    active_loops: AtomicUsize,
}

impl EngineState {
    /// Creates a new state: idle, audio and auto-restart off.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, RunSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the user settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the current mode.
    pub fn mode(&self) -> EngineMode {
        self.slot().mode
    }

    /// Returns true if a run is active.
    pub fn is_running(&self) -> bool {
        self.mode() == EngineMode::Running
    }

    /// Returns the id of the most recently started run (0 before any run).
    pub fn current_run(&self) -> RunId {
        self.slot().current
    }

    /// Marks a new run as started and returns its id.
    pub fn begin_run(&self) -> RunId {
        let mut slot = self.slot();
        slot.current += 1;
        slot.mode = EngineMode::Running;
        slot.current
    }

    /// Forces the mode to idle.
    pub fn set_idle(&self) {
        self.slot().mode = EngineMode::Idle;
    }

    /// Moves to idle if `run` is still the current run.
    ///
    /// Returns false when a newer run has already replaced it.
    pub fn finish_run(&self, run: RunId) -> bool {
        let mut slot = self.slot();
        if slot.current != run {
            return false;
        }
        slot.mode = EngineMode::Idle;
        true
    }

    /// Returns the number of phase loops currently executing.
    pub fn active_loops(&self) -> usize {
        self.active_loops.load(Ordering::SeqCst)
    }

    /// Registers an executing phase loop until the guard is dropped.
    pub fn enter_loop(&self) -> LoopGuard<'_> {
        let previous = self.active_loops.fetch_add(1, Ordering::SeqCst);
        if previous > 0 {
            tracing::warn!(active = previous + 1, "more than one phase loop is active");
        }
        LoopGuard { state: self }
    }
}

/// Keeps a phase loop counted as active while alive.
#[derive(Debug)]
pub struct LoopGuard<'a> {
    state: &'a EngineState,
}

impl Drop for LoopGuard<'_> {
    fn drop(&mut self) {
        self.state.active_loops.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod phase_kind_tests {
        use super::*;

        #[test]
        fn test_as_str() {
            assert_eq!(PhaseKind::Work.as_str(), "work");
            assert_eq!(PhaseKind::ShortBreak.as_str(), "short_break");
            assert_eq!(PhaseKind::FinalBreak.as_str(), "final_break");
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&PhaseKind::FinalBreak).unwrap();
            assert_eq!(json, "\"final_break\"");

            let kind: PhaseKind = serde_json::from_str("\"short_break\"").unwrap();
            assert_eq!(kind, PhaseKind::ShortBreak);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_uses_constants() {
            let config = CycleConfig::default();
            assert_eq!(config.work_periods, 4);
            assert_eq!(config.work, Duration::from_secs(25 * 60));
            assert_eq!(config.short_break, Duration::from_secs(5 * 60));
            assert_eq!(config.final_break, Duration::from_secs(30 * 60));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_zero_periods() {
            let config = CycleConfig::default().with_work_periods(0);
            let err = config.validate().unwrap_err();
            assert_eq!(err, ConfigError::NoWorkPeriods);
            assert!(err.to_string().contains("at least 1"));
        }

        #[test]
        fn test_validate_rejects_zero_duration() {
            let config = CycleConfig::default().with_short_break(Duration::ZERO);
            let err = config.validate().unwrap_err();
            assert_eq!(err, ConfigError::ZeroDuration(PhaseKind::ShortBreak));
            assert_eq!(err.to_string(), "short_break duration must be non-zero");
        }

        #[test]
        fn test_uniform_duration() {
            let config = CycleConfig::default().with_uniform_duration(Duration::from_secs(1));
            assert_eq!(config.duration_of(PhaseKind::Work), Duration::from_secs(1));
            assert_eq!(config.duration_of(PhaseKind::ShortBreak), Duration::from_secs(1));
            assert_eq!(config.duration_of(PhaseKind::FinalBreak), Duration::from_secs(1));
        }
    }

    mod sequence_tests {
        use super::*;

        #[test]
        fn test_default_sequence_order() {
            let kinds: Vec<PhaseKind> = CycleConfig::default()
                .sequence()
                .iter()
                .map(|p| p.kind)
                .collect();

            assert_eq!(
                kinds,
                vec![
                    PhaseKind::Work,
                    PhaseKind::ShortBreak,
                    PhaseKind::Work,
                    PhaseKind::ShortBreak,
                    PhaseKind::Work,
                    PhaseKind::ShortBreak,
                    PhaseKind::Work,
                    PhaseKind::FinalBreak,
                ]
            );
        }

        #[test]
        fn test_sequence_shape_for_many_counts() {
            for n in 1..=12 {
                let sequence = CycleConfig::default().with_work_periods(n).sequence();
                assert_eq!(sequence.len(), (2 * n) as usize, "n = {}", n);

                for (index, phase) in sequence.iter().enumerate() {
                    let ordinal = index as u32 + 1;
                    assert_eq!(phase.ordinal, ordinal);
                    let expected = if ordinal == 2 * n {
                        PhaseKind::FinalBreak
                    } else if ordinal % 2 == 1 {
                        PhaseKind::Work
                    } else {
                        PhaseKind::ShortBreak
                    };
                    assert_eq!(phase.kind, expected, "n = {}, ordinal = {}", n, ordinal);
                }
            }
        }

        #[test]
        fn test_single_period_sequence() {
            let sequence = CycleConfig::default().with_work_periods(1).sequence();
            assert_eq!(sequence.len(), 2);
            assert_eq!(sequence[0].kind, PhaseKind::Work);
            assert_eq!(sequence[1].kind, PhaseKind::FinalBreak);
        }

        #[test]
        fn test_sequence_durations_follow_kind() {
            let config = CycleConfig::default();
            for phase in config.sequence() {
                assert_eq!(phase.duration, config.duration_of(phase.kind));
            }
        }
    }

    mod engine_state_tests {
        use super::*;

        #[test]
        fn test_new_state_is_idle_and_silent() {
            let state = EngineState::new();
            assert_eq!(state.mode(), EngineMode::Idle);
            assert!(!state.settings().audio_enabled());
            assert!(!state.settings().auto_restart_enabled());
            assert_eq!(state.current_run(), 0);
        }

        #[test]
        fn test_settings_toggle() {
            let state = EngineState::new();
            state.settings().set_audio_enabled(true);
            state.settings().set_auto_restart_enabled(true);
            assert!(state.settings().audio_enabled());
            assert!(state.settings().auto_restart_enabled());

            state.settings().set_audio_enabled(false);
            assert!(!state.settings().audio_enabled());
        }

        #[test]
        fn test_begin_run_increments_id() {
            let state = EngineState::new();
            assert_eq!(state.begin_run(), 1);
            assert_eq!(state.begin_run(), 2);
            assert!(state.is_running());
        }

        #[test]
        fn test_finish_stale_run_keeps_mode() {
            let state = EngineState::new();
            let old = state.begin_run();
            let _new = state.begin_run();

            assert!(!state.finish_run(old));
            assert_eq!(state.mode(), EngineMode::Running);
        }

        #[test]
        fn test_finish_current_run_goes_idle() {
            let state = EngineState::new();
            let run = state.begin_run();
            assert!(state.finish_run(run));
            assert_eq!(state.mode(), EngineMode::Idle);
        }

        #[test]
        fn test_loop_guard_counts() {
            let state = EngineState::new();
            {
                let _a = state.enter_loop();
                assert_eq!(state.active_loops(), 1);
            }
            assert_eq!(state.active_loops(), 0);
        }

        #[test]
        fn test_mode_serialize() {
            let json = serde_json::to_string(&EngineMode::Running).unwrap();
            assert_eq!(json, "\"running\"");
        }
    }
}
