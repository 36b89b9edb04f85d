//! Chain read interface: allowance and balance views, receipt waits, and
//! the transfer-event query backing post-swap diagnostics.

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::error::Result;

/// A mined transaction receipt, reduced to what the engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// A decoded ERC-20 Transfer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Read-only chain access plus receipt waits.
///
/// # Errors
///
/// Methods return [`Result`] for RPC failures.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Chain id the client is currently connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Current ERC-20 allowance granted by `owner` to `spender` on `token`.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Current ERC-20 balance of `account` on `token`.
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    /// Wait for `tx_hash` to be mined and return its receipt.
    ///
    /// There is no orchestration-level timeout: this relies on whatever
    /// default wait behavior the underlying client provides.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt>;

    /// Transfer events on `token` addressed to `to` within `block`.
    async fn transfer_events_to(
        &self,
        token: Address,
        to: Address,
        block: u64,
    ) -> Result<Vec<TransferEvent>>;
}
