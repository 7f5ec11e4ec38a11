//! Notification system error types.

use thiserror::Error;

/// Errors that can occur when dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification server rejected or failed the request.
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check the desktop notification settings",
        }
    }
}
