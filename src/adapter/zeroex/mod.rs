//! Quote service adapter.

pub mod client;
pub mod dto;

pub use client::{ZeroExClient, QUOTE_PATH_SUFFIX};
