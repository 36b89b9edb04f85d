//! Canonical quote, price, and swap-and-pay records.
//!
//! A [`Price`] is an indicative preview; a [`Quote`] carries the exact call
//! payload required to execute the swap. Both live for the duration of one
//! orchestration call and are never persisted.

use alloy_primitives::{Address, Bytes, TxHash, U256};

/// Parameters common to price and quote requests.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Token being sold (ERC-20 address; native assets resolve to their
    /// wrapped equivalent before reaching this point).
    pub sell_token: Address,
    /// Token being bought.
    pub buy_token: Address,
    /// Sell amount in base units.
    pub sell_amount: U256,
    /// Account initiating and paying for the swap. Also passed to the quote
    /// service as the settlement recipient.
    pub taker: Address,
    /// Maximum tolerated adverse price movement, in basis points.
    pub slippage_bps: u32,
    /// Chain the swap settles on.
    pub chain_id: u64,
}

/// An executable swap quote, normalized from the quote service response.
#[derive(Debug, Clone)]
pub struct Quote {
    /// Settlement contract to submit the swap transaction to.
    pub to: Address,
    /// Opaque call payload for the settlement contract.
    pub data: Bytes,
    /// Native-asset amount to attach, if any. Defaults to zero on submit.
    pub value: Option<U256>,
    /// Expected buy-token output in base units.
    pub buy_amount: U256,
    /// Contract that must hold spending permission for the sell token.
    pub allowance_target: Option<Address>,
    /// Name of the payload shape adapter that matched, for diagnostics.
    pub shape: &'static str,
}

/// A preview-only price record. Never used to submit a transaction.
#[derive(Debug, Clone)]
pub struct Price {
    /// Indicative exchange rate as reported by the service.
    pub price: String,
    /// Expected buy-token output in base units.
    pub buy_amount: U256,
    /// Sell amount in base units.
    pub sell_amount: U256,
}

/// Optional automatic-approval input for [`SwapAndPayParams`].
#[derive(Debug, Clone)]
pub struct AutoApprove {
    /// Token being sold, which the allowance target must be able to spend.
    pub sell_token: Address,
    /// Required spending allowance in base units.
    pub sell_amount: U256,
    /// Approve exactly `sell_amount` instead of the infinite default.
    pub use_exact: bool,
}

/// Parameters for one swap-and-pay orchestration.
#[derive(Debug, Clone)]
pub struct SwapAndPayParams {
    pub quote: Quote,
    /// Destination the post-swap proceeds are forwarded to.
    pub receiver: Address,
    /// Token received from the swap and forwarded to `receiver`.
    pub buy_token: Address,
    /// When present (and the quote names an allowance target), the
    /// orchestrator ensures the allowance before swapping.
    pub auto_approve: Option<AutoApprove>,
}

/// Terminal success value of one orchestration. Both hashes are present or
/// the operation failed; partial progress is surfaced through the status
/// sink, not the return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAndPayResult {
    pub swap_hash: TxHash,
    pub transfer_hash: TxHash,
}

/// Outcome of an allowance check.
///
/// `approved == true` means the existing allowance was sufficient and no
/// transaction was submitted. Otherwise `tx_hash` names the approval
/// transaction the caller must wait on before trusting the allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceDecision {
    pub approved: bool,
    pub tx_hash: Option<TxHash>,
}
