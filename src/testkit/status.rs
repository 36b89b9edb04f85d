//! Recording [`StatusSink`] double.

use std::sync::Mutex;

use crate::domain::SwapPhase;
use crate::port::StatusSink;

/// Captures every phase transition in order.
#[derive(Default)]
pub struct RecordingSink {
    phases: Mutex<Vec<SwapPhase>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phases(&self) -> Vec<SwapPhase> {
        self.phases.lock().unwrap().clone()
    }

    /// True when a phase for which `predicate` holds was recorded.
    pub fn saw(&self, predicate: impl Fn(&SwapPhase) -> bool) -> bool {
        self.phases.lock().unwrap().iter().any(predicate)
    }
}

impl StatusSink for RecordingSink {
    fn update(&self, phase: &SwapPhase) {
        self.phases.lock().unwrap().push(phase.clone());
    }
}
