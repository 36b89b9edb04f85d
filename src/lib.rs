//! Kiosko - swap a token on-chain and forward the proceeds in one action.
//!
//! The core is the transaction orchestrator: it fetches an executable quote
//! from an external aggregation service, ensures the sell token has
//! sufficient spending permission, submits the swap, confirms the resulting
//! balance actually materialized, and forwards it to a receiver account.
//! Swap pricing, key management, and fee estimation stay with external
//! collaborators.
//!
//! # Architecture
//!
//! Hexagonal: the engine in [`app`] depends only on the traits in [`port`];
//! the real backends live in [`adapter`].
//!
//! - **`port::chain`** - allowance/balance reads, receipt waits, log queries
//! - **`port::wallet`** - the signing capability with its two variants,
//!   `ContractWrite` and `RawSubmit`
//! - **`port::quote`** - price/quote fetching
//! - **`adapter::zeroex`** - the aggregator client behind a
//!   credential-injecting proxy
//! - **`adapter::evm`** - alloy-backed chain reader, local-signer wallet,
//!   and network switching
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with environment overrides
//! - [`domain`] - tokens, quotes, swap parameters, orchestration phases
//! - [`error`] - error taxonomy for the crate
//! - [`port`] - trait seams between engine and collaborators
//! - [`adapter`] - backend implementations of the ports
//! - [`app`] - the orchestration engine, allowance manager, and retry
//!   combinator
//! - [`cli`] - the `kiosko` command-line binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kiosko::adapter::evm::{EvmChain, LocalWallet};
//! use kiosko::adapter::zeroex::ZeroExClient;
//! use kiosko::app::{ExecutionContext, PayRequest, SwapPay};
//!
//! # async fn demo() -> kiosko::error::Result<()> {
//! let rpc: url::Url = "https://testnet-rpc.monad.xyz".parse()?;
//! let wallet = LocalWallet::new("0x…", 10143, rpc.clone())?.into_capability(false);
//! let ctx = ExecutionContext::builder()
//!     .chain(Arc::new(EvmChain::new(rpc)))
//!     .wallet(wallet)
//!     .required_chain_id(10143)
//!     .build()?;
//! let quoter = ZeroExClient::new("https://proxy.example.com/quote".parse()?)?;
//! let engine = SwapPay::new(ctx, quoter);
//! let result = engine
//!     .execute(&PayRequest {
//!         sell_symbol: "WMON".into(),
//!         buy_symbol: "USDC".into(),
//!         amount: "0.01".into(),
//!         receiver: "0x0000000000000000000000000000000000000001".parse().unwrap(),
//!         slippage_bps: 100,
//!         use_exact_approval: false,
//!     })
//!     .await?;
//! println!("{result:?}");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
