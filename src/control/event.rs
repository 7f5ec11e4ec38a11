//! Control events and menu button identities.
//!
//! Events come from the menu (one per button) or from typed commands on
//! the console; both map onto the same [`ControlEvent`] values.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// ControlEvent
// ============================================================================

/// A discrete user request handled by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// Start a cycle
    Start,
    /// Stop the running cycle
    Stop,
    /// Stop any running cycle and start a new one
    Restart,
    /// Turn the alert sound on
    EnableAudio,
    /// Turn the alert sound off
    DisableAudio,
    /// Turn auto-restart on
    EnableAutoRestart,
    /// Turn auto-restart off
    DisableAutoRestart,
    /// Stop everything and exit
    Quit,
}

impl ControlEvent {
    /// Returns the console command for this event.
    pub fn as_command(&self) -> &'static str {
        match self {
            ControlEvent::Start => "start",
            ControlEvent::Stop => "stop",
            ControlEvent::Restart => "restart",
            ControlEvent::EnableAudio => "audio on",
            ControlEvent::DisableAudio => "audio off",
            ControlEvent::EnableAutoRestart => "auto on",
            ControlEvent::DisableAutoRestart => "auto off",
            ControlEvent::Quit => "quit",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

/// Error returned when a console line is not a known command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEventError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl FromStr for ControlEvent {
    type Err = ParseEventError;

    /// Accepts console commands (`audio on`, `auto-off`, ...) and menu labels,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        let event = match normalized.as_str() {
            "" => return Err(ParseEventError::Empty),
            "start" => ControlEvent::Start,
            "stop" => ControlEvent::Stop,
            "restart" => ControlEvent::Restart,
            "audio on" => ControlEvent::EnableAudio,
            "audio off" => ControlEvent::DisableAudio,
            "auto on" => ControlEvent::EnableAutoRestart,
            "auto off" => ControlEvent::DisableAutoRestart,
            "quit" | "exit" | "q" => ControlEvent::Quit,
            other => {
                return ButtonId::ALL
                    .iter()
                    .find(|button| button.label().eq_ignore_ascii_case(other))
                    .map(ButtonId::to_event)
                    .ok_or_else(|| ParseEventError::Unknown(s.trim().to_string()));
            }
        };
        Ok(event)
    }
}

// ============================================================================
// ButtonId
// ============================================================================

/// Identity of a menu item the control surface can enable, disable, show
/// or hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonId {
    Start,
    Stop,
    Restart,
    EnableAutoRestart,
    DisableAutoRestart,
    EnableAudio,
    DisableAudio,
    Quit,
}

impl ButtonId {
    /// Every button, in menu order.
    pub const ALL: [ButtonId; 8] = [
        ButtonId::Start,
        ButtonId::Stop,
        ButtonId::Restart,
        ButtonId::EnableAutoRestart,
        ButtonId::DisableAutoRestart,
        ButtonId::EnableAudio,
        ButtonId::DisableAudio,
        ButtonId::Quit,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ButtonId::Start => "Start",
            ButtonId::Stop => "Stop",
            ButtonId::Restart => "Restart",
            ButtonId::EnableAutoRestart => "Enable Auto Restart",
            ButtonId::DisableAutoRestart => "Disable Auto Restart",
            ButtonId::EnableAudio => "Enable Audio Signal",
            ButtonId::DisableAudio => "Disable Audio Signal",
            ButtonId::Quit => "Quit",
        }
    }

    /// Hover text.
    pub fn tooltip(&self) -> &'static str {
        match self {
            ButtonId::Start => "Start Cycle",
            ButtonId::Stop => "Stop Current Cycle",
            ButtonId::Restart => "Restart Cycle",
            ButtonId::EnableAutoRestart => "Enable Auto Restart",
            ButtonId::DisableAutoRestart => "Disable Auto Restart",
            ButtonId::EnableAudio => "Enable Audio Signal",
            ButtonId::DisableAudio => "Disable Audio Signal",
            ButtonId::Quit => "Quit the whole app",
        }
    }

    /// The event a click on this button produces.
    pub fn to_event(&self) -> ControlEvent {
        match self {
            ButtonId::Start => ControlEvent::Start,
            ButtonId::Stop => ControlEvent::Stop,
            ButtonId::Restart => ControlEvent::Restart,
            ButtonId::EnableAutoRestart => ControlEvent::EnableAutoRestart,
            ButtonId::DisableAutoRestart => ControlEvent::DisableAutoRestart,
            ButtonId::EnableAudio => ControlEvent::EnableAudio,
            ButtonId::DisableAudio => ControlEvent::DisableAudio,
            ButtonId::Quit => ControlEvent::Quit,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
