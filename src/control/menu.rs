//! Menu affordances.
//!
//! This module handles:
//! - Enable/disable/show/hide commands keyed by [`ButtonId`]
//! - The sinks that receive them (menu model, channel, recorder)
//! - The affordance sets for idle, running and the two toggle pairs
//!
//! The logic is platform-independent; rendering the menu is left to whoever
//! consumes the updates.

use std::collections::BTreeMap;
use std::fmt;

use crossbeam_channel::Sender;

use super::event::ButtonId;

// ============================================================================
// Affordance
// ============================================================================

/// A UI command for a single menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Enable(ButtonId),
    Disable(ButtonId),
    Show(ButtonId),
    Hide(ButtonId),
}

impl Affordance {
    /// Returns the button this command targets.
    pub fn button(&self) -> ButtonId {
        match *self {
            Affordance::Enable(b)
            | Affordance::Disable(b)
            | Affordance::Show(b)
            | Affordance::Hide(b) => b,
        }
    }
}

/// Commands that put the menu into the idle layout.
pub fn idle_affordances() -> [Affordance; 3] {
    [
        Affordance::Enable(ButtonId::Start),
        Affordance::Disable(ButtonId::Stop),
        Affordance::Disable(ButtonId::Restart),
    ]
}

/// Commands that put the menu into the running layout.
pub fn running_affordances() -> [Affordance; 3] {
    [
        Affordance::Disable(ButtonId::Start),
        Affordance::Enable(ButtonId::Stop),
        Affordance::Enable(ButtonId::Restart),
    ]
}

/// Shows the button that flips the audio setting, hides the other.
pub fn audio_affordances(enabled: bool) -> [Affordance; 2] {
    toggle_pair(enabled, ButtonId::EnableAudio, ButtonId::DisableAudio)
}

/// Shows the button that flips the auto-restart setting, hides the other.
pub fn auto_restart_affordances(enabled: bool) -> [Affordance; 2] {
    toggle_pair(
        enabled,
        ButtonId::EnableAutoRestart,
        ButtonId::DisableAutoRestart,
    )
}

fn toggle_pair(enabled: bool, enable: ButtonId, disable: ButtonId) -> [Affordance; 2] {
    if enabled {
        [Affordance::Hide(enable), Affordance::Show(disable)]
    } else {
        [Affordance::Show(enable), Affordance::Hide(disable)]
    }
}

// ============================================================================
// AffordanceSink
// ============================================================================

/// Receives UI commands from the control surface.
pub trait AffordanceSink {
    /// Applies one command.
    fn apply(&mut self, update: Affordance);

    /// Applies several commands in order.
    fn apply_all(&mut self, updates: &[Affordance]) {
        for update in updates {
            self.apply(*update);
        }
    }
}

/// Forwards commands to another thread (e.g., the menu renderer).
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Affordance>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Affordance>) -> Self {
        Self { tx }
    }
}

impl AffordanceSink for ChannelSink {
    fn apply(&mut self, update: Affordance) {
        if self.tx.send(update).is_err() {
            tracing::warn!(button = %update.button(), "menu update channel disconnected");
        }
    }
}

// ============================================================================
// MenuState
// ============================================================================

/// Enabled/visible flags of one menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState {
    pub enabled: bool,
    pub visible: bool,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
        }
    }
}

/// Model of the whole menu, built up from affordance commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    items: BTreeMap<ButtonId, ItemState>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            items: ButtonId::ALL
                .iter()
                .map(|&b| (b, ItemState::default()))
                .collect(),
        }
    }
}

impl MenuState {
    /// Creates a menu with every item enabled and visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of one item.
    pub fn item(&self, button: ButtonId) -> ItemState {
        self.items.get(&button).copied().unwrap_or_default()
    }

    pub fn is_enabled(&self, button: ButtonId) -> bool {
        self.item(button).enabled
    }

    pub fn is_visible(&self, button: ButtonId) -> bool {
        self.item(button).visible
    }

    /// Visible buttons in menu order.
    pub fn visible_buttons(&self) -> Vec<ButtonId> {
        ButtonId::ALL
            .iter()
            .copied()
            .filter(|&b| self.is_visible(b))
            .collect()
    }
}

impl AffordanceSink for MenuState {
    fn apply(&mut self, update: Affordance) {
        let item = self.items.entry(update.button()).or_default();
        match update {
            Affordance::Enable(_) => item.enabled = true,
            Affordance::Disable(_) => item.enabled = false,
            Affordance::Show(_) => item.visible = true,
            Affordance::Hide(_) => item.visible = false,
        }
    }
}

impl fmt::Display for MenuState {
    /// One line per visible item; disabled items are bracketed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for button in self.visible_buttons() {
            if self.is_enabled(button) {
                writeln!(f, "  {}", button.label())?;
            } else {
                writeln!(f, "  ({})", button.label())?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// RecordingSink
// ============================================================================

/// Sink for tests: keeps every command plus the resulting menu model.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    updates: Vec<Affordance>,
    menu: MenuState,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn updates(&self) -> &[Affordance] {
        &self.updates
    }

    #[must_use]
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn clear_updates(&mut self) {
        self.updates.clear();
    }
}

impl AffordanceSink for RecordingSink {
    fn apply(&mut self, update: Affordance) {
        self.updates.push(update);
        self.menu.apply(update);
    }
}
