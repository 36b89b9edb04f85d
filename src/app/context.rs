//! Execution context: the collaborators one orchestration runs against.
//!
//! Constructed once and passed into every call; nothing is read from
//! ambient process-wide state.

use std::sync::Arc;

use crate::error::{ConfigError, ExecutionError, Result};
use crate::port::{ChainReader, NetworkSwitch, NullSink, SigningCapability, StatusSink};

/// Chain client, signing capability, and reporting channels for one
/// orchestration. The engine treats the handles as read-mostly
/// collaborators and never mutates them.
#[derive(Clone)]
pub struct ExecutionContext {
    pub(crate) chain: Arc<dyn ChainReader>,
    pub(crate) wallet: SigningCapability,
    /// Primary network-switch capability, tried first on a chain mismatch.
    pub(crate) network: Option<Arc<dyn NetworkSwitch>>,
    /// Wallet-level fallback switch capability.
    pub(crate) wallet_network: Option<Arc<dyn NetworkSwitch>>,
    pub(crate) status: Arc<dyn StatusSink>,
    pub(crate) required_chain_id: u64,
}

impl ExecutionContext {
    #[must_use]
    pub fn builder() -> ExecutionContextBuilder {
        ExecutionContextBuilder::default()
    }

    /// The connected account, derived from the signing capability.
    #[must_use]
    pub fn account(&self) -> alloy_primitives::Address {
        self.wallet.address()
    }
}

/// Builder for [`ExecutionContext`]. Missing chain or signing handles fail
/// at build time rather than mid-orchestration.
#[derive(Default)]
pub struct ExecutionContextBuilder {
    chain: Option<Arc<dyn ChainReader>>,
    wallet: Option<SigningCapability>,
    network: Option<Arc<dyn NetworkSwitch>>,
    wallet_network: Option<Arc<dyn NetworkSwitch>>,
    status: Option<Arc<dyn StatusSink>>,
    required_chain_id: Option<u64>,
}

impl ExecutionContextBuilder {
    #[must_use]
    pub fn chain(mut self, chain: Arc<dyn ChainReader>) -> Self {
        self.chain = Some(chain);
        self
    }

    #[must_use]
    pub fn wallet(mut self, wallet: SigningCapability) -> Self {
        self.wallet = Some(wallet);
        self
    }

    #[must_use]
    pub fn network_switch(mut self, switch: Arc<dyn NetworkSwitch>) -> Self {
        self.network = Some(switch);
        self
    }

    #[must_use]
    pub fn wallet_network_switch(mut self, switch: Arc<dyn NetworkSwitch>) -> Self {
        self.wallet_network = Some(switch);
        self
    }

    #[must_use]
    pub fn status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn required_chain_id(mut self, chain_id: u64) -> Self {
        self.required_chain_id = Some(chain_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ExecutionError::NoChainClient`] without a chain reader,
    /// [`ExecutionError::NoAccount`] without a signing capability, and
    /// [`ConfigError::MissingField`] without a required chain id.
    pub fn build(self) -> Result<ExecutionContext> {
        let chain = self.chain.ok_or(ExecutionError::NoChainClient)?;
        let wallet = self.wallet.ok_or(ExecutionError::NoAccount)?;
        let required_chain_id = self.required_chain_id.ok_or(ConfigError::MissingField {
            field: "required_chain_id",
        })?;
        Ok(ExecutionContext {
            chain,
            wallet,
            network: self.network,
            wallet_network: self.wallet_network,
            status: self.status.unwrap_or_else(|| Arc::new(NullSink)),
            required_chain_id,
        })
    }
}
