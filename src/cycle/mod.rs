//! Cycle execution.
//!
//! - `cancel`: per-run cooperative cancellation handle
//! - `engine`: the phase loop

pub mod cancel;
pub mod engine;

pub use cancel::CancelHandle;
pub use engine::{CycleEngine, CycleEvent, RunOutcome, FINAL_WARNING_REPEATS};
