//! Control surface for the working cycle timer.
//!
//! The control surface is the single consumer of user events. It serializes
//! them against the engine mode, owns the task handle of the active run and
//! drives the menu affordances.
//!
//! - `event.rs`: control events and button identities
//! - `menu.rs`: affordance commands, sinks and the menu model
//!
//! # Run lifecycle
//!
//! Every Start/Restart spawns the phase loop as its own task with a fresh
//! [`CancelHandle`]. Stop, Restart and Quit cancel the active handle and
//! await the task before doing anything else, so at most one phase loop is
//! alive at any time.

pub mod event;
pub mod menu;

pub use event::{ButtonId, ControlEvent, ParseEventError};
pub use menu::{
    Affordance, AffordanceSink, ChannelSink, ItemState, MenuState, RecordingSink,
};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cycle::{CancelHandle, CycleEngine, CycleEvent, RunOutcome};
use crate::notification::{Notice, Notifier};
use crate::sound::AudioPlayer;
use crate::types::{ConfigError, CycleConfig, EngineMode, EngineState, RunId};

use menu::{audio_affordances, auto_restart_affordances, idle_affordances, running_affordances};

/// Whether the event loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct ActiveRun {
    id: RunId,
    cancel: CancelHandle,
    task: JoinHandle<RunOutcome>,
}

/// Translates control events into engine operations and UI updates.
pub struct ControlSurface<S> {
    engine: CycleEngine,
    state: Arc<EngineState>,
    notifier: Arc<dyn Notifier>,
    sink: S,
    active: Option<ActiveRun>,
    cycle_events: mpsc::UnboundedReceiver<CycleEvent>,
}

impl<S: AffordanceSink> ControlSurface<S> {
    /// Creates a control surface and the engine it drives.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of an invalid `config`.
    pub fn new(
        config: CycleConfig,
        state: Arc<EngineState>,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioPlayer>,
        sink: S,
    ) -> Result<Self, ConfigError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = CycleEngine::new(config, Arc::clone(&state), Arc::clone(&notifier), audio)?
            .with_events(tx);
        Ok(Self {
            engine,
            state,
            notifier,
            sink,
            active: None,
            cycle_events: rx,
        })
    }

    /// Returns the shared engine state.
    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    /// Returns the affordance sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the current mode.
    pub fn mode(&self) -> EngineMode {
        self.state.mode()
    }

    /// Pushes the full menu layout for the current mode and settings.
    pub fn initialize(&mut self) {
        let settings = self.state.settings();
        let (audio, auto) = (settings.audio_enabled(), settings.auto_restart_enabled());

        self.apply_mode_affordances();
        self.sink.apply_all(&audio_affordances(audio));
        self.sink.apply_all(&auto_restart_affordances(auto));
    }

    /// Consumes events until Quit arrives or the source closes.
    ///
    /// Cycle events from the engine are interleaved so the menu returns to
    /// the idle layout when a run completes on its own. Returns the sink.
    pub async fn run(mut self, mut events: mpsc::Receiver<ControlEvent>) -> S {
        self.initialize();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if self.handle(event).await == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        info!("event source closed, shutting down");
                        self.handle(ControlEvent::Quit).await;
                        break;
                    }
                },
                Some(cycle_event) = self.cycle_events.recv() => {
                    self.on_cycle_event(cycle_event).await;
                }
            }
        }

        self.sink
    }

    /// Handles one control event.
    pub async fn handle(&mut self, event: ControlEvent) -> Flow {
        debug!(event = %event, mode = self.mode().as_str(), "control event");

        match event {
            ControlEvent::Start => self.start(),
            ControlEvent::Stop => self.stop().await,
            ControlEvent::Restart => self.restart().await,
            ControlEvent::EnableAudio => self.set_audio(true),
            ControlEvent::DisableAudio => self.set_audio(false),
            ControlEvent::EnableAutoRestart => self.set_auto_restart(true),
            ControlEvent::DisableAutoRestart => self.set_auto_restart(false),
            ControlEvent::Quit => {
                self.retire_active().await;
                self.state.set_idle();
                info!("quitting");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    fn start(&mut self) {
        if self.state.is_running() {
            debug!("start ignored, a cycle is already running");
            return;
        }
        self.launch();
        self.sink.apply_all(&running_affordances());
    }

    async fn stop(&mut self) {
        if !self.state.is_running() {
            debug!("stop ignored, no cycle is running");
            return;
        }
        self.retire_active().await;
        self.state.set_idle();
        info!("cycle stopped by user");

        if let Err(e) = self.notifier.send(&Notice::stopped()) {
            warn!("failed to send stop notification: {}", e);
        }
        self.sink.apply_all(&idle_affordances());
    }

    async fn restart(&mut self) {
        self.retire_active().await;
        self.launch();
        self.sink.apply_all(&running_affordances());
    }

    fn set_audio(&mut self, enabled: bool) {
        self.state.settings().set_audio_enabled(enabled);
        info!(enabled, "audio signal toggled");
        self.sink.apply_all(&audio_affordances(enabled));
    }

    fn set_auto_restart(&mut self, enabled: bool) {
        self.state.settings().set_auto_restart_enabled(enabled);
        info!(enabled, "auto restart toggled");
        self.sink.apply_all(&auto_restart_affordances(enabled));
    }

    fn launch(&mut self) {
        let id = self.state.begin_run();
        let cancel = CancelHandle::new();
        let engine = self.engine.clone();
        let task = tokio::spawn({
            let cancel = cancel.clone();
            async move { engine.start(id, cancel).await }
        });
        info!(run_id = id, "launched cycle");
        self.active = Some(ActiveRun { id, cancel, task });
    }

    /// Cancels the active run, if any, and waits for its task to finish.
    async fn retire_active(&mut self) {
        let Some(run) = self.active.take() else {
            return;
        };
        run.cancel.request_cancel();
        Self::join(run).await;
    }

    async fn join(run: ActiveRun) {
        match run.task.await {
            Ok(outcome) => debug!(run_id = run.id, ?outcome, "cycle task finished"),
            Err(e) => error!(run_id = run.id, "cycle task failed: {}", e),
        }
    }

    async fn on_cycle_event(&mut self, event: CycleEvent) {
        match event {
            CycleEvent::Completed { run_id } => {
                let finished = match self.active.take() {
                    Some(run) if run.id == run_id => run,
                    other => {
                        self.active = other;
                        return;
                    }
                };
                Self::join(finished).await;
                if self.mode() == EngineMode::Idle {
                    self.sink.apply_all(&idle_affordances());
                }
            }
            CycleEvent::PhaseStarted { run_id, phase } => {
                debug!(run_id, ordinal = phase.ordinal, kind = %phase.kind, "phase started");
            }
            CycleEvent::Restarted { run_id, round } => {
                debug!(run_id, round, "cycle restarted");
            }
            CycleEvent::Cancelled { run_id } => {
                debug!(run_id, "cycle cancelled");
            }
        }
    }

    fn apply_mode_affordances(&mut self) {
        match self.mode() {
            EngineMode::Idle => self.sink.apply_all(&idle_affordances()),
            EngineMode::Running => self.sink.apply_all(&running_affordances()),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for ControlSurface<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSurface")
            .field("engine", &self.engine)
            .field("active_run", &self.active.as_ref().map(|run| run.id))
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
