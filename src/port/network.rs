//! Network-switch capability.

use async_trait::async_trait;

use crate::error::Result;

/// Ask the connected wallet or chain client to change to a target chain.
///
/// The orchestrator tries a primary switch capability first and falls back
/// to a wallet-level one; both are best-effort.
#[async_trait]
pub trait NetworkSwitch: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the backend refuses or does not support the
    /// switch request.
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;
}
