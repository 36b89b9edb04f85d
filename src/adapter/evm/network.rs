//! Network switching over the wallet RPC surface.

use alloy_provider::{Provider, ProviderBuilder};
use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::error::{ExecutionError, Result};
use crate::port::NetworkSwitch;

/// Requests `wallet_switchEthereumChain` on the connected endpoint.
///
/// Plain RPC nodes reject the method; the orchestrator treats that like any
/// other failed best-effort switch.
pub struct WalletRpcSwitch {
    rpc_url: Url,
}

impl WalletRpcSwitch {
    #[must_use]
    pub fn new(rpc_url: Url) -> Self {
        Self { rpc_url }
    }
}

#[async_trait]
impl NetworkSwitch for WalletRpcSwitch {
    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let params = [json!({ "chainId": format!("0x{chain_id:x}") })];
        let _: serde_json::Value = provider
            .raw_request("wallet_switchEthereumChain".into(), params)
            .await
            .map_err(|e| ExecutionError::NetworkSwitchFailed {
                chain_id,
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
