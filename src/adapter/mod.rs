//! Adapters implementing the ports against real backends.

pub mod evm;
pub mod zeroex;
