//! Local-signer wallet adapter.
//!
//! Backs both signing capability variants: typed ERC-20 contract writes and
//! raw pre-encoded submission. Submissions return the transaction hash
//! without waiting for it to be mined; confirmation is the caller's call.

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use url::Url;

use crate::domain::erc20::IERC20;
use crate::error::{ConfigError, ExecutionError, Result};
use crate::port::{ContractWriteWallet, RawSubmitWallet, SigningCapability};

/// Wallet over a local private key and an HTTP RPC endpoint.
#[derive(Debug)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    rpc_url: Url,
}

impl LocalWallet {
    /// Create a wallet from a hex private key.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the key is empty or invalid.
    pub fn new(private_key: &str, chain_id: u64, rpc_url: Url) -> Result<Self> {
        if private_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into());
        }

        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })?
            .with_chain_id(Some(chain_id));

        Ok(Self { signer, rpc_url })
    }

    /// Wrap this wallet in the capability variant the caller wants the
    /// engine to dispatch on.
    #[must_use]
    pub fn into_capability(self, raw_only: bool) -> SigningCapability {
        let wallet = Arc::new(self);
        if raw_only {
            SigningCapability::RawSubmit(wallet)
        } else {
            SigningCapability::ContractWrite(wallet)
        }
    }

    fn provider(&self) -> impl Provider {
        let wallet = EthereumWallet::from(self.signer.clone());
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone())
    }
}

#[async_trait]
impl RawSubmitWallet for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .from(self.signer.address())
            .to(to)
            .input(data.into())
            .value(value);

        let pending = self
            .provider()
            .send_transaction(tx)
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;
        Ok(*pending.tx_hash())
    }
}

#[async_trait]
impl ContractWriteWallet for LocalWallet {
    async fn write_approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let provider = self.provider();
        let erc20 = IERC20::new(token, &provider);
        let pending = erc20
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn write_transfer(&self, token: Address, to: Address, amount: U256) -> Result<TxHash> {
        let provider = self.provider();
        let erc20 = IERC20::new(token, &provider);
        let pending = erc20
            .transfer(to, amount)
            .send()
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;
        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn rpc_url() -> Url {
        "https://testnet-rpc.monad.xyz".parse().unwrap()
    }

    #[test]
    fn empty_key_is_rejected() {
        match LocalWallet::new("  ", 10143, rpc_url()) {
            Err(crate::error::Error::Config(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            })) => {}
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn invalid_key_is_rejected() {
        assert!(LocalWallet::new("0xnothex", 10143, rpc_url()).is_err());
    }

    #[test]
    fn capability_variants_share_one_address() {
        let raw = LocalWallet::new(TEST_KEY, 10143, rpc_url())
            .unwrap()
            .into_capability(true);
        let typed = LocalWallet::new(TEST_KEY, 10143, rpc_url())
            .unwrap()
            .into_capability(false);

        assert!(matches!(raw, SigningCapability::RawSubmit(_)));
        assert!(matches!(typed, SigningCapability::ContractWrite(_)));
        assert_eq!(raw.address(), typed.address());
    }
}
