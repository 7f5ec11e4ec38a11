//! Cycle engine for the working cycle timer.
//!
//! This module provides the phase loop:
//! - Sequencing Work / ShortBreak / FinalBreak phases
//! - Racing each phase timer against the run's cancel handle
//! - Alert sound and notification at every phase boundary
//! - Auto-restart after the final break

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::cancel::CancelHandle;
use crate::notification::{Notice, Notifier};
use crate::sound::AudioPlayer;
use crate::types::{ConfigError, CycleConfig, EngineState, Phase, RunId};

/// How many times the alert plays when the final break is over.
pub const FINAL_WARNING_REPEATS: u32 = 3;

// ============================================================================
// CycleEvent
// ============================================================================

/// Progress events published by a running cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// A phase began (after its alert and notification)
    PhaseStarted {
        /// Run the phase belongs to
        run_id: RunId,
        /// The phase
        phase: Phase,
    },
    /// The final break elapsed and the sequence starts over
    Restarted {
        /// Run that restarted
        run_id: RunId,
        /// 1-based count of the sequence now starting
        round: u32,
    },
    /// The final break elapsed and the run ended
    Completed {
        /// Run that ended
        run_id: RunId,
    },
    /// The run stopped because its handle was cancelled
    Cancelled {
        /// Run that stopped
        run_id: RunId,
    },
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Final break elapsed with auto-restart off
    Completed,
    /// Cancel handle was signalled
    Cancelled,
}

// ============================================================================
// CycleEngine
// ============================================================================

/// Runs cycles of timed phases.
///
/// Cloning is cheap; each clone shares the same collaborators and state.
#[derive(Clone)]
pub struct CycleEngine {
    config: CycleConfig,
    state: Arc<EngineState>,
    notifier: Arc<dyn Notifier>,
    audio: Arc<dyn AudioPlayer>,
    events: Option<mpsc::UnboundedSender<CycleEvent>>,
}

impl CycleEngine {
    /// Creates a new engine.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of an invalid `config`.
    pub fn new(
        config: CycleConfig,
        state: Arc<EngineState>,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state,
            notifier,
            audio,
            events: None,
        })
    }

    /// Publishes [`CycleEvent`]s on the given channel.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<CycleEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs one cycle until it completes or `cancel` is signalled.
    ///
    /// The caller must make sure no other run is active and must have
    /// registered `run_id` with [`EngineState::begin_run`]. On natural
    /// completion the mode returns to idle; the handle is retired either way.
    pub async fn start(&self, run_id: RunId, cancel: CancelHandle) -> RunOutcome {
        let _guard = self.state.enter_loop();
        info!(run_id, "cycle started");

        let outcome = self.run_phases(run_id, &cancel).await;
        cancel.retire();

        match outcome {
            RunOutcome::Completed => {
                if !self.state.finish_run(run_id) {
                    debug!(run_id, "a newer run owns the mode, leaving it unchanged");
                }
                info!(run_id, "cycle completed");
                self.emit(CycleEvent::Completed { run_id });
            }
            RunOutcome::Cancelled => {
                info!(run_id, "cycle cancelled");
                self.emit(CycleEvent::Cancelled { run_id });
            }
        }
        outcome
    }

    async fn run_phases(&self, run_id: RunId, cancel: &CancelHandle) -> RunOutcome {
        let sequence = self.config.sequence();
        let mut round = 1;

        loop {
            for phase in &sequence {
                if cancel.is_cancelled() {
                    return RunOutcome::Cancelled;
                }

                self.enter_phase(run_id, phase);

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return RunOutcome::Cancelled,
                    _ = sleep(phase.duration) => {}
                }
                debug!(run_id, ordinal = phase.ordinal, kind = %phase.kind, "phase elapsed");
            }

            if self.state.settings().audio_enabled() {
                self.audio.play_repeated(FINAL_WARNING_REPEATS);
            }

            if !self.state.settings().auto_restart_enabled() {
                return RunOutcome::Completed;
            }

            round += 1;
            info!(run_id, round, "auto-restarting cycle");
            self.emit(CycleEvent::Restarted { run_id, round });
        }
    }

    fn enter_phase(&self, run_id: RunId, phase: &Phase) {
        debug!(run_id, ordinal = phase.ordinal, kind = %phase.kind, "entering phase");

        if self.state.settings().audio_enabled() {
            self.audio.play_once();
        }

        if let Err(e) = self.notifier.send(&Notice::phase_started(phase.kind)) {
            warn!(
                run_id,
                kind = %phase.kind,
                "notification failed, continuing: {} ({})",
                e,
                e.suggestion()
            );
        }

        self.emit(CycleEvent::PhaseStarted {
            run_id,
            phase: *phase,
        });
    }

    fn emit(&self, event: CycleEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("cycle event receiver dropped");
            }
        }
    }
}

impl std::fmt::Debug for CycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MockNotifier;
    use crate::sound::{MockAudioPlayer, PlayCall};
    use crate::types::{EngineMode, PhaseKind};
    use tokio::time::Duration;

    const UNIT: Duration = Duration::from_secs(60);

    struct Harness {
        engine: CycleEngine,
        state: Arc<EngineState>,
        notifier: Arc<MockNotifier>,
        audio: Arc<MockAudioPlayer>,
        events: mpsc::UnboundedReceiver<CycleEvent>,
    }

    fn harness() -> Harness {
        harness_with(CycleConfig::default().with_uniform_duration(UNIT))
    }

    fn harness_with(config: CycleConfig) -> Harness {
        let state = Arc::new(EngineState::new());
        let notifier = Arc::new(MockNotifier::new());
        let audio = Arc::new(MockAudioPlayer::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = CycleEngine::new(
            config,
            Arc::clone(&state),
            notifier.clone(),
            audio.clone(),
        )
        .unwrap()
        .with_events(tx);
        Harness {
            engine,
            state,
            notifier,
            audio,
            events: rx,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<CycleEvent>) -> Vec<CycleEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn expected_bodies() -> Vec<String> {
        CycleConfig::default()
            .sequence()
            .iter()
            .map(|p| Notice::phase_started(p.kind).body.to_string())
            .collect()
    }

    mod run_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_full_cycle_notifies_in_order_then_idles() {
            let h = harness();
            let run = h.state.begin_run();

            let outcome = h.engine.start(run, CancelHandle::new()).await;

            assert_eq!(outcome, RunOutcome::Completed);
            assert_eq!(h.notifier.count(), 8);
            assert_eq!(h.notifier.bodies(), expected_bodies());
            assert_eq!(h.state.mode(), EngineMode::Idle);
            assert_eq!(h.state.active_loops(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_phase_events_carry_ordinals() {
            let mut h = harness();
            let run = h.state.begin_run();
            h.engine.start(run, CancelHandle::new()).await;

            let events = drain(&mut h.events);
            let ordinals: Vec<u32> = events
                .iter()
                .filter_map(|e| match e {
                    CycleEvent::PhaseStarted { phase, .. } => Some(phase.ordinal),
                    _ => None,
                })
                .collect();
            assert_eq!(ordinals, (1..=8).collect::<Vec<_>>());
            assert_eq!(events.last(), Some(&CycleEvent::Completed { run_id: run }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_handle_is_retired_after_completion() {
            let h = harness_with(
                CycleConfig::default()
                    .with_work_periods(1)
                    .with_uniform_duration(UNIT),
            );
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();

            h.engine.start(run, cancel.clone()).await;

            assert!(cancel.is_retired());
            assert!(!cancel.request_cancel());
            assert!(!cancel.request_cancel());
            assert_eq!(h.notifier.count(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_notification_failure_does_not_stop_cycle() {
            let h = harness();
            h.notifier.set_should_fail(true);
            let run = h.state.begin_run();

            let outcome = h.engine.start(run, CancelHandle::new()).await;

            assert_eq!(outcome, RunOutcome::Completed);
            assert_eq!(h.notifier.count(), 8);
            assert_eq!(h.state.mode(), EngineMode::Idle);
        }
    }

    mod cancel_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_cancel_mid_phase_halts_sequence() {
            let mut h = harness();
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            let engine = h.engine.clone();
            let task = tokio::spawn({
                let cancel = cancel.clone();
                async move { engine.start(run, cancel).await }
            });

            // Midway through phase 3
            sleep(UNIT * 2 + UNIT / 2).await;
            assert_eq!(h.notifier.count(), 3);

            assert!(cancel.request_cancel());
            assert_eq!(task.await.unwrap(), RunOutcome::Cancelled);

            sleep(UNIT * 20).await;
            assert_eq!(h.notifier.count(), 3);
            assert_eq!(
                drain(&mut h.events).last(),
                Some(&CycleEvent::Cancelled { run_id: run })
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancelled_before_start_emits_nothing() {
            let h = harness();
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            cancel.request_cancel();

            let outcome = h.engine.start(run, cancel).await;

            assert_eq!(outcome, RunOutcome::Cancelled);
            assert_eq!(h.notifier.count(), 0);
            assert_eq!(h.audio.play_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_leaves_mode_to_caller() {
            let h = harness();
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            cancel.request_cancel();

            h.engine.start(run, cancel).await;
            assert_eq!(h.state.mode(), EngineMode::Running);
        }

        #[tokio::test(start_paused = true)]
        async fn test_double_cancel_is_harmless() {
            let h = harness();
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            let engine = h.engine.clone();
            let task = tokio::spawn({
                let cancel = cancel.clone();
                async move { engine.start(run, cancel).await }
            });

            sleep(UNIT / 2).await;
            assert!(cancel.request_cancel());
            assert!(!cancel.request_cancel());
            task.await.unwrap();
            assert!(!cancel.request_cancel());

            assert_eq!(h.notifier.count(), 1);
        }
    }

    mod audio_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_audio_disabled_plays_nothing() {
            let h = harness();
            let run = h.state.begin_run();
            h.engine.start(run, CancelHandle::new()).await;
            assert_eq!(h.audio.play_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_audio_enabled_beeps_each_phase_and_warns_at_end() {
            let h = harness();
            h.state.settings().set_audio_enabled(true);
            let run = h.state.begin_run();
            h.engine.start(run, CancelHandle::new()).await;

            let mut expected = vec![PlayCall::Once; 8];
            expected.push(PlayCall::Repeated(FINAL_WARNING_REPEATS));
            assert_eq!(h.audio.calls(), expected);
        }

        #[tokio::test(start_paused = true)]
        async fn test_audio_toggle_applies_at_next_boundary() {
            let h = harness();
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            let engine = h.engine.clone();
            let task = tokio::spawn({
                let cancel = cancel.clone();
                async move { engine.start(run, cancel).await }
            });

            sleep(UNIT / 2).await;
            h.state.settings().set_audio_enabled(true);
            assert_eq!(h.audio.play_count(), 0);

            sleep(UNIT).await;
            assert_eq!(h.audio.calls(), vec![PlayCall::Once]);

            cancel.request_cancel();
            task.await.unwrap();
        }
    }

    mod auto_restart_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_auto_restart_begins_new_round_without_idling() {
            let mut h = harness();
            h.state.settings().set_auto_restart_enabled(true);
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            let engine = h.engine.clone();
            let task = tokio::spawn({
                let cancel = cancel.clone();
                async move { engine.start(run, cancel).await }
            });

            sleep(UNIT * 8 + UNIT / 2).await;
            let bodies = h.notifier.bodies();
            assert_eq!(bodies.len(), 9);
            assert_eq!(bodies[8], Notice::phase_started(PhaseKind::Work).body);
            assert_eq!(h.state.mode(), EngineMode::Running);

            let events = drain(&mut h.events);
            assert!(events.contains(&CycleEvent::Restarted { run_id: run, round: 2 }));
            let restarted_ordinal = events.iter().rev().find_map(|e| match e {
                CycleEvent::PhaseStarted { phase, .. } => Some(phase.ordinal),
                _ => None,
            });
            assert_eq!(restarted_ordinal, Some(1));

            cancel.request_cancel();
            assert_eq!(task.await.unwrap(), RunOutcome::Cancelled);
        }

        #[tokio::test(start_paused = true)]
        async fn test_auto_restart_flag_is_read_when_final_break_ends() {
            let h = harness();
            h.state.settings().set_auto_restart_enabled(true);
            let run = h.state.begin_run();
            let engine = h.engine.clone();
            let task = tokio::spawn(async move { engine.start(run, CancelHandle::new()).await });

            // During the final break
            sleep(UNIT * 7 + UNIT / 2).await;
            h.state.settings().set_auto_restart_enabled(false);

            assert_eq!(task.await.unwrap(), RunOutcome::Completed);
            assert_eq!(h.notifier.count(), 8);
            assert_eq!(h.state.mode(), EngineMode::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_during_final_break_suppresses_restart() {
            let h = harness();
            h.state.settings().set_auto_restart_enabled(true);
            let run = h.state.begin_run();
            let cancel = CancelHandle::new();
            let engine = h.engine.clone();
            let task = tokio::spawn({
                let cancel = cancel.clone();
                async move { engine.start(run, cancel).await }
            });

            sleep(UNIT * 7 + UNIT / 2).await;
            cancel.request_cancel();

            assert_eq!(task.await.unwrap(), RunOutcome::Cancelled);
            sleep(UNIT * 4).await;
            assert_eq!(h.notifier.count(), 8);
        }
    }

    mod config_tests {
        use super::*;

        fn engine_with(config: CycleConfig) -> Result<CycleEngine, ConfigError> {
            CycleEngine::new(
                config,
                Arc::new(EngineState::new()),
                Arc::new(MockNotifier::new()),
                Arc::new(MockAudioPlayer::new()),
            )
        }

        #[test]
        fn test_rejects_zero_work_periods() {
            let err = engine_with(CycleConfig::default().with_work_periods(0)).unwrap_err();
            assert_eq!(err, ConfigError::NoWorkPeriods);
        }

        #[test]
        fn test_rejects_zero_length_phase() {
            let err = engine_with(CycleConfig::default().with_final_break(Duration::ZERO))
                .unwrap_err();
            assert_eq!(err, ConfigError::ZeroDuration(PhaseKind::FinalBreak));
        }

        #[test]
        fn test_accepts_single_work_period() {
            assert!(engine_with(CycleConfig::default().with_work_periods(1)).is_ok());
        }
    }
}
