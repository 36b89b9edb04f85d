//! Status side-channel.
//!
//! The result type only carries both hashes on full success, so partial
//! progress must be observable here instead.

use crate::domain::SwapPhase;

/// Receives every phase transition of an orchestration.
pub trait StatusSink: Send + Sync {
    fn update(&self, phase: &SwapPhase);
}

/// Sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn update(&self, _phase: &SwapPhase) {}
}
