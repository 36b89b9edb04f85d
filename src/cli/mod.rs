//! Command-line interface.
//!
//! Wires the engine to real adapters: the quote proxy over HTTP, an alloy
//! chain reader, and a local-signer wallet taken from `WALLET_PRIVATE_KEY`.

use std::path::PathBuf;
use std::sync::Arc;

use alloy_primitives::{utils::format_units, Address};
use clap::{Parser, Subcommand};
use url::Url;

use crate::adapter::evm::{EvmChain, LocalWallet, WalletRpcSwitch};
use crate::adapter::zeroex::ZeroExClient;
use crate::app::{ExecutionContext, PayRequest, SwapPay};
use crate::config::Config;
use crate::domain::token::{resolve_decimals, resolve_quote_address};
use crate::domain::SwapPhase;
use crate::error::{ExecutionError, Result};
use crate::port::{RawSubmitWallet as _, StatusSink};

/// Environment variable holding the signer's private key.
pub const ENV_WALLET_KEY: &str = "WALLET_PRIVATE_KEY";

#[derive(Debug, Parser)]
#[command(
    name = "kiosko",
    version,
    about = "Swap a token on-chain and forward the proceeds in one action"
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "kiosko.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Preview the price of a swap without executing anything.
    Price {
        /// Symbol of the token to sell (e.g. MON, WMON).
        sell: String,
        /// Symbol of the token to receive (e.g. USDC).
        buy: String,
        /// Human-readable sell amount, e.g. 0.01.
        amount: String,
        /// Taker address; defaults to the wallet derived from
        /// WALLET_PRIVATE_KEY.
        #[arg(long)]
        taker: Option<Address>,
    },
    /// Fetch an executable quote and print its summary.
    Quote {
        sell: String,
        buy: String,
        amount: String,
        #[arg(long)]
        taker: Option<Address>,
    },
    /// Read the allowance a spender currently holds.
    Allowance {
        /// Symbol of the token to inspect.
        token: String,
        /// Spender contract address.
        spender: Address,
        /// Owner address; defaults to the wallet derived from
        /// WALLET_PRIVATE_KEY.
        #[arg(long)]
        owner: Option<Address>,
    },
    /// Swap and forward the proceeds to the receiver.
    Pay {
        sell: String,
        buy: String,
        amount: String,
        /// Destination account for the proceeds.
        receiver: Address,
        /// Approve exactly the sell amount instead of the infinite default.
        #[arg(long)]
        exact_approval: bool,
        /// Submit pre-encoded transactions instead of typed contract
        /// writes.
        #[arg(long)]
        raw_submit: bool,
    },
}

/// Prints each phase transition as it happens.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn update(&self, phase: &SwapPhase) {
        println!("→ {phase}");
    }
}

/// Dispatch a parsed command against the loaded configuration.
///
/// # Errors
///
/// Returns any configuration, quote, or execution error for `main` to
/// report.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Price {
            sell,
            buy,
            amount,
            taker,
        } => price(&config, &sell, &buy, &amount, taker).await,
        Command::Quote {
            sell,
            buy,
            amount,
            taker,
        } => quote(&config, &sell, &buy, &amount, taker).await,
        Command::Allowance {
            token,
            spender,
            owner,
        } => allowance(&config, &token, spender, owner).await,
        Command::Pay {
            sell,
            buy,
            amount,
            receiver,
            exact_approval,
            raw_submit,
        } => {
            pay(
                &config,
                &sell,
                &buy,
                &amount,
                receiver,
                exact_approval,
                raw_submit,
            )
            .await
        }
    }
}

fn rpc_url(config: &Config) -> Result<Url> {
    Ok(config.network.rpc_url.parse()?)
}

/// Resolve the acting account: an explicit flag wins, otherwise the wallet
/// key from the environment.
fn resolve_account(config: &Config, explicit: Option<Address>) -> Result<Address> {
    if let Some(address) = explicit {
        return Ok(address);
    }
    match std::env::var(ENV_WALLET_KEY) {
        Ok(key) => {
            let wallet = LocalWallet::new(&key, config.network.chain_id, rpc_url(config)?)?;
            Ok(wallet.address())
        }
        Err(_) => Err(ExecutionError::NoAccount.into()),
    }
}

fn quote_request(
    config: &Config,
    sell: &str,
    buy: &str,
    amount: &str,
    taker: Address,
) -> Result<crate::domain::QuoteRequest> {
    Ok(crate::domain::QuoteRequest {
        sell_token: resolve_quote_address(sell)?,
        buy_token: resolve_quote_address(buy)?,
        sell_amount: crate::domain::token::parse_amount(amount, resolve_decimals(sell)?)?,
        taker,
        slippage_bps: config.quote.slippage_bps,
        chain_id: config.network.chain_id,
    })
}

async fn price(
    config: &Config,
    sell: &str,
    buy: &str,
    amount: &str,
    taker: Option<Address>,
) -> Result<()> {
    use crate::port::SwapQuoter as _;

    let client = ZeroExClient::from_config(&config.quote)?;
    let taker = resolve_account(config, taker)?;
    let price = client
        .price(&quote_request(config, sell, buy, amount, taker)?)
        .await?;

    let buy_decimals = resolve_decimals(buy)?;
    let human = format_units(price.buy_amount, buy_decimals)
        .unwrap_or_else(|_| price.buy_amount.to_string());
    println!("price: {}", price.price);
    println!("expected output: {human} {buy} ({} base units)", price.buy_amount);
    Ok(())
}

async fn quote(
    config: &Config,
    sell: &str,
    buy: &str,
    amount: &str,
    taker: Option<Address>,
) -> Result<()> {
    use crate::port::SwapQuoter as _;

    let client = ZeroExClient::from_config(&config.quote)?;
    let taker = resolve_account(config, taker)?;
    let quote = client
        .quote(&quote_request(config, sell, buy, amount, taker)?)
        .await?;

    println!("target: {}", quote.to);
    println!("buy amount: {} base units", quote.buy_amount);
    println!("payload shape: {}", quote.shape);
    match quote.allowance_target {
        Some(spender) => println!("allowance target: {spender}"),
        None => println!("allowance target: none"),
    }
    Ok(())
}

async fn allowance(
    config: &Config,
    token: &str,
    spender: Address,
    owner: Option<Address>,
) -> Result<()> {
    use crate::port::ChainReader as _;

    let chain = EvmChain::new(rpc_url(config)?);
    let owner = resolve_account(config, owner)?;
    let token_address = resolve_quote_address(token)?;
    let current = chain.allowance(token_address, owner, spender).await?;
    println!("allowance({owner} -> {spender}) on {token}: {current}");
    Ok(())
}

async fn pay(
    config: &Config,
    sell: &str,
    buy: &str,
    amount: &str,
    receiver: Address,
    exact_approval: bool,
    raw_submit: bool,
) -> Result<()> {
    let key = std::env::var(ENV_WALLET_KEY).map_err(|_| ExecutionError::NoAccount)?;
    let rpc = rpc_url(config)?;
    let wallet =
        LocalWallet::new(&key, config.network.chain_id, rpc.clone())?.into_capability(raw_submit);

    let ctx = ExecutionContext::builder()
        .chain(Arc::new(EvmChain::new(rpc.clone())))
        .wallet(wallet)
        .network_switch(Arc::new(WalletRpcSwitch::new(rpc)))
        .status(Arc::new(ConsoleSink))
        .required_chain_id(config.network.chain_id)
        .build()?;

    let engine = SwapPay::new(ctx, ZeroExClient::from_config(&config.quote)?);
    let result = engine
        .execute(&PayRequest {
            sell_symbol: sell.to_string(),
            buy_symbol: buy.to_string(),
            amount: amount.to_string(),
            receiver,
            slippage_bps: config.quote.slippage_bps,
            use_exact_approval: exact_approval,
        })
        .await?;

    println!("swap hash:     {}", result.swap_hash);
    println!("transfer hash: {}", result.transfer_hash);
    Ok(())
}
