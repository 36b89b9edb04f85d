//! Signing capability: the chain write interface.
//!
//! Wallet backends differ in what they expose. Some can encode and submit
//! typed contract writes themselves; others only accept a pre-encoded raw
//! transaction. The original duck-typed probing is replaced by two explicit
//! trait variants, dispatched through [`SigningCapability`].

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::error::Result;

/// A wallet that can only submit pre-encoded transactions.
///
/// # Errors
///
/// Submission failures (insufficient funds, user rejection) are surfaced
/// as-is with their native message.
#[async_trait]
pub trait RawSubmitWallet: Send + Sync {
    /// The connected account transactions are sent from.
    fn address(&self) -> Address;

    /// Submit a transaction and return its hash without waiting for it to
    /// be mined.
    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash>;
}

/// A wallet that can additionally encode and submit typed ERC-20 writes.
#[async_trait]
pub trait ContractWriteWallet: RawSubmitWallet {
    /// Submit `approve(spender, amount)` on `token`; returns the hash.
    async fn write_approve(&self, token: Address, spender: Address, amount: U256)
        -> Result<TxHash>;

    /// Submit `transfer(to, amount)` on `token`; returns the hash.
    async fn write_transfer(&self, token: Address, to: Address, amount: U256) -> Result<TxHash>;
}

/// The two signing capability variants the engine dispatches on.
#[derive(Clone)]
pub enum SigningCapability {
    /// Backend exposes typed contract writes.
    ContractWrite(Arc<dyn ContractWriteWallet>),
    /// Backend only accepts raw transaction submission; ERC-20 writes are
    /// encoded by the engine.
    RawSubmit(Arc<dyn RawSubmitWallet>),
}

impl SigningCapability {
    /// The connected account.
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::ContractWrite(w) => w.address(),
            Self::RawSubmit(w) => w.address(),
        }
    }

    /// Submit a pre-encoded transaction through either variant.
    pub async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<TxHash> {
        match self {
            Self::ContractWrite(w) => w.send_transaction(to, data, value).await,
            Self::RawSubmit(w) => w.send_transaction(to, data, value).await,
        }
    }
}

impl std::fmt::Debug for SigningCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContractWrite(w) => f
                .debug_tuple("ContractWrite")
                .field(&w.address())
                .finish(),
            Self::RawSubmit(w) => f.debug_tuple("RawSubmit").field(&w.address()).finish(),
        }
    }
}
