//! Per-run cancellation handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Flags {
    signalled: AtomicBool,
    retired: AtomicBool,
}

/// Cooperative cancellation signal for a single cycle run.
///
/// Clones share the same signal. Cancelling is idempotent, and once the run
/// has ended the handle is retired so further requests do nothing.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    flags: Arc<Flags>,
}

impl CancelHandle {
    /// Creates a fresh, unsignalled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the run to stop at its next check point.
    ///
    /// Returns true only for the call that actually delivered the signal.
    /// Repeated calls and calls on a retired handle return false.
    pub fn request_cancel(&self) -> bool {
        if self.flags.retired.load(Ordering::SeqCst) {
            return false;
        }
        if self.flags.signalled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        true
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Marks the handle as belonging to a finished run.
    pub fn retire(&self) {
        self.flags.retired.store(true, Ordering::SeqCst);
    }

    /// Returns true if the run owning this handle has ended.
    pub fn is_retired(&self) -> bool {
        self.flags.retired.load(Ordering::SeqCst)
    }
}
