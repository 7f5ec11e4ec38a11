//! Desktop notification support.
//!
//! The cycle engine and the control surface only see the [`Notifier`] trait.
//! [`DesktopNotifier`] delivers through the platform notification service via
//! `notify-rust`; [`MockNotifier`] records calls for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use working_cycles::notification::{DesktopNotifier, Notice, Notifier};
//! use working_cycles::types::PhaseKind;
//!
//! let notifier = DesktopNotifier::new();
//! if let Err(e) = notifier.send(&Notice::phase_started(PhaseKind::Work)) {
//!     eprintln!("notification failed: {}", e);
//! }
//! ```

mod content;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

pub use self::content::{Notice, ALERT_ICON, APP_TITLE};
pub use self::error::NotificationError;

/// Something that can show a notification to the user.
///
/// Implementations must be callable from the phase loop task and should
/// return quickly.
pub trait Notifier: Send + Sync {
    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn notify(&self, title: &str, body: &str, icon: &str) -> Result<(), NotificationError>;

    /// Shows a prepared [`Notice`].
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn send(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.notify(notice.title, notice.body, notice.icon)
    }
}

// ============================================================================
// DesktopNotifier
// ============================================================================

/// Notifier backed by the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    /// Creates a new desktop notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, icon: &str) -> Result<(), NotificationError> {
        debug!(title, body, "showing desktop notification");
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .icon(icon)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// A notification captured by [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentNotification>>,
    should_fail: AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail (after recording the attempt).
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Bodies of every recorded notification, in order.
    #[must_use]
    pub fn bodies(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|n| n.body.clone()).collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, body: &str, icon: &str) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentNotification {
            title: title.to_string(),
            body: body.to_string(),
            icon: icon.to_string(),
        });
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        Ok(())
    }
}
