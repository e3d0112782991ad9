//! One-shot actions that fire after a delay
//!
//! Pops leave the bubble on screen for a short exit animation and gold pops
//! leave a text overlay for a second. Both are queued here against the
//! session clock and drained as time advances. Actions are remove-if-present,
//! so firing after the target is already gone does nothing and nothing ever
//! needs cancelling.

use serde::{Deserialize, Serialize};

/// Cleanup to run when a deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Drop a popped bubble and clear its popping flag
    RemoveBubble(u32),
    /// Drop a pop effect overlay
    RemoveEffect(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    due: f64,
    action: DeferredAction,
}

/// Deadline-ordered action queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeferredQueue {
    /// Seconds since the queue was created
    now: f64,
    /// Kept sorted by deadline; equal deadlines keep scheduling order
    pending: Vec<Pending>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run `action` once `delay_secs` have passed
    pub fn schedule(&mut self, delay_secs: f32, action: DeferredAction) {
        let due = self.now + delay_secs as f64;
        let index = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(index, Pending { due, action });
    }

    /// Move time forward and return the actions that came due, oldest first
    pub fn advance(&mut self, dt: f32) -> Vec<DeferredAction> {
        self.now += dt as f64;
        // Small tolerance so 6 steps of 1/30 s close a 0.2 s window
        let cutoff = self.now + 1e-6;
        let ready = self.pending.partition_point(|p| p.due <= cutoff);
        self.pending.drain(..ready).map(|p| p.action).collect()
    }
}
