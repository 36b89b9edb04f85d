//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - [`ScriptedChain`](chain::ScriptedChain): scripted balance
//!   readings, fixed allowances, canned receipts and transfer events.
//! - [`wallet`] - [`RecordingWallet`](wallet::RecordingWallet): both
//!   capability variants, recording every submission.
//! - [`quote`] - [`StaticQuoter`](quote::StaticQuoter): canned price/quote
//!   responses.
//! - [`status`] - [`RecordingSink`](status::RecordingSink): captures phase
//!   transitions.

pub mod chain;
pub mod quote;
pub mod status;
pub mod wallet;
