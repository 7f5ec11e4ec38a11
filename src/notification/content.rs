//! Notification content for phase boundaries and stop events.

use crate::types::PhaseKind;

/// Title shared by every notification.
pub const APP_TITLE: &str = "60-60-30 Working cycles";

/// Icon reference passed along with every notification.
pub const ALERT_ICON: &str = "assets/warning.png";

const WORK_BODY: &str = "New working period begun. Focus on your work for 25 minutes";
const SHORT_BREAK_BODY: &str = "Take a short rest. 5 minutes and get back to work!";
const FINAL_BREAK_BODY: &str = "Take a rest for 30 minutes";
const STOPPED_BODY: &str = "Cycle stopped";

/// A notification ready to be handed to a [`Notifier`](super::Notifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    /// Summary line
    pub title: &'static str,
    /// Body text
    pub body: &'static str,
    /// Icon reference
    pub icon: &'static str,
}

impl Notice {
    /// Notice emitted when a phase of the given kind begins.
    pub fn phase_started(kind: PhaseKind) -> Self {
        let body = match kind {
            PhaseKind::Work => WORK_BODY,
            PhaseKind::ShortBreak => SHORT_BREAK_BODY,
            PhaseKind::FinalBreak => FINAL_BREAK_BODY,
        };
        Self {
            title: APP_TITLE,
            body,
            icon: ALERT_ICON,
        }
    }

    /// Notice emitted when the user stops a cycle.
    pub fn stopped() -> Self {
        Self {
            title: APP_TITLE,
            body: STOPPED_BODY,
            icon: ALERT_ICON,
        }
    }
}
