//! The swap-and-pay orchestration engine.
//!
//! One invocation is a strictly sequential chain of asynchronous steps:
//! network alignment, optional approval, swap submission, balance
//! confirmation, and the final transfer to the receiver. Every later step
//! depends on the prior step's on-chain effect having landed, so nothing
//! overlaps within one invocation.
//!
//! Once a transaction has been submitted it is irrevocable; a failure after
//! that point stops subsequent steps but cannot un-submit anything, and the
//! overall flow is never retried. Concurrent invocations for the same
//! account race on the allowance check-then-act; callers must serialize per
//! account if they need that safety.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use tracing::{info, warn};

use crate::app::allowance::{ensure_allowance, send_transfer};
use crate::app::context::ExecutionContext;
use crate::app::retry::retry_until;
use crate::domain::token::{parse_amount, resolve_decimals, resolve_quote_address};
use crate::domain::{
    AutoApprove, Price, QuoteRequest, SwapAndPayParams, SwapAndPayResult, SwapPhase,
};
use crate::error::{Error, ExecutionError, Result};
use crate::port::SwapQuoter;

/// Balance confirmation attempts after the swap is mined.
const BALANCE_POLL_ATTEMPTS: u32 = 6;

/// Delay between balance confirmation attempts.
const BALANCE_POLL_DELAY: Duration = Duration::from_millis(250);

/// A user-facing pay request in human units; resolved against the token
/// registry by [`SwapPay::execute`] and [`SwapPay::preview`].
#[derive(Debug, Clone)]
pub struct PayRequest {
    /// Symbol of the token being sold (native symbols resolve to their
    /// wrapped equivalent).
    pub sell_symbol: String,
    /// Symbol of the token the receiver is paid in.
    pub buy_symbol: String,
    /// Human-entered sell amount, e.g. `"0.01"`.
    pub amount: String,
    /// Destination account for the proceeds.
    pub receiver: Address,
    /// Slippage tolerance in basis points.
    pub slippage_bps: u32,
    /// Approve exactly the sell amount instead of the infinite default.
    pub use_exact_approval: bool,
}

/// The transaction orchestrator.
pub struct SwapPay<Q: SwapQuoter> {
    ctx: ExecutionContext,
    quoter: Q,
}

impl<Q: SwapQuoter> SwapPay<Q> {
    #[must_use]
    pub fn new(ctx: ExecutionContext, quoter: Q) -> Self {
        Self { ctx, quoter }
    }

    /// Fetch an indicative price for `request` without executing anything.
    ///
    /// # Errors
    ///
    /// Returns registry, parsing, or quote-service errors.
    pub async fn preview(&self, request: &PayRequest) -> Result<Price> {
        self.quoter.price(&self.quote_request(request)?).await
    }

    /// Fetch an executable quote and run the full swap-and-pay flow.
    ///
    /// # Errors
    ///
    /// Any step failing aborts the flow; see [`SwapPay::swap_and_pay`].
    pub async fn execute(&self, request: &PayRequest) -> Result<SwapAndPayResult> {
        self.ctx.status.update(&SwapPhase::Init);

        let quote_request = self.quote_request(request)?;
        let quote = self.quoter.quote(&quote_request).await?;
        info!(
            to = %quote.to,
            buy_amount = %quote.buy_amount,
            shape = quote.shape,
            "quote received"
        );

        self.swap_and_pay(SwapAndPayParams {
            auto_approve: Some(AutoApprove {
                sell_token: quote_request.sell_token,
                sell_amount: quote_request.sell_amount,
                use_exact: request.use_exact_approval,
            }),
            receiver: request.receiver,
            buy_token: quote_request.buy_token,
            quote,
        })
        .await
    }

    /// Run the orchestration against an already-fetched quote.
    ///
    /// On success both hashes are returned; on failure the terminal
    /// [`SwapPhase::Failed`] status carries one displayable message, and any
    /// transactions submitted before the failure remain on-chain.
    ///
    /// # Errors
    ///
    /// See the crate error taxonomy; no step is retried except the internal
    /// balance confirmation.
    pub async fn swap_and_pay(&self, params: SwapAndPayParams) -> Result<SwapAndPayResult> {
        match self.run(params).await {
            Ok(result) => {
                self.ctx.status.update(&SwapPhase::Done);
                Ok(result)
            }
            Err(err) => {
                self.ctx.status.update(&SwapPhase::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn run(&self, params: SwapAndPayParams) -> Result<SwapAndPayResult> {
        let account = self.ctx.account();
        let quote = &params.quote;

        self.align_network().await;

        // Approval, only when requested and the quote names a spender.
        if let (Some(auto), Some(spender)) = (&params.auto_approve, quote.allowance_target) {
            self.ctx.status.update(&SwapPhase::Approving);
            let decision = ensure_allowance(
                self.ctx.chain.as_ref(),
                &self.ctx.wallet,
                auto.sell_token,
                account,
                spender,
                auto.sell_amount,
                auto.use_exact,
            )
            .await?;

            if let (false, Some(tx_hash)) = (decision.approved, decision.tx_hash) {
                self.ctx
                    .status
                    .update(&SwapPhase::AwaitingApproveConfirm { tx_hash });
                self.ctx.chain.wait_for_receipt(tx_hash).await?;
            }
        }

        // The normalization boundary already guarantees 20 bytes; what can
        // still go wrong syntactically is the zero address.
        if quote.to == Address::ZERO {
            return Err(ExecutionError::InvalidTarget { target: quote.to }.into());
        }

        self.ctx.status.update(&SwapPhase::Swapping);
        let swap_hash = self
            .ctx
            .wallet
            .send_transaction(
                quote.to,
                quote.data.clone(),
                quote.value.unwrap_or_default(),
            )
            .await?;
        info!(%swap_hash, to = %quote.to, "swap submitted");

        self.ctx
            .status
            .update(&SwapPhase::AwaitingSwapConfirm { tx_hash: swap_hash });
        let receipt = self.ctx.chain.wait_for_receipt(swap_hash).await?;

        self.ctx.status.update(&SwapPhase::ConfirmingBalance);
        let observed = retry_until(
            BALANCE_POLL_ATTEMPTS,
            BALANCE_POLL_DELAY,
            || self.ctx.chain.balance_of(params.buy_token, account),
            |balance| !balance.is_zero(),
        )
        .await?;

        if observed.is_zero() {
            self.log_missing_output(params.buy_token, account, receipt.block_number)
                .await;
            return Err(no_output(params.buy_token));
        }

        // Clamp against upstream slippage producing less than quoted, or an
        // unrelated pre-existing balance producing more.
        let amount_to_send = observed.min(quote.buy_amount);
        if amount_to_send.is_zero() {
            return Err(no_output(params.buy_token));
        }

        self.ctx.status.update(&SwapPhase::Transferring {
            amount: amount_to_send,
        });
        let transfer_hash = send_transfer(
            &self.ctx.wallet,
            params.buy_token,
            params.receiver,
            amount_to_send,
        )
        .await?;
        info!(%transfer_hash, receiver = %params.receiver, %amount_to_send, "transfer submitted");

        Ok(SwapAndPayResult {
            swap_hash,
            transfer_hash,
        })
    }

    /// Best-effort network alignment: try the primary switch capability,
    /// then the wallet-level fallback. Failure to switch is not fatal,
    /// since legacy quotes may already match the connected chain.
    async fn align_network(&self) {
        self.ctx.status.update(&SwapPhase::NetworkCheck);

        let connected = match self.ctx.chain.chain_id().await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "could not read connected chain id");
                return;
            }
        };
        if connected == self.ctx.required_chain_id {
            return;
        }

        let required = self.ctx.required_chain_id;
        warn!(connected, required, "chain mismatch, requesting switch");

        for switch in [&self.ctx.network, &self.ctx.wallet_network]
            .into_iter()
            .flatten()
        {
            match switch.switch_chain(required).await {
                Ok(()) => {
                    info!(chain_id = required, "network switched");
                    return;
                }
                Err(err) => warn!(error = %err, "network switch attempt failed"),
            }
        }
        warn!(
            connected,
            required, "continuing on mismatched chain after failed switch attempts"
        );
    }

    /// Diagnostic event-log query after balance confirmation came up empty.
    /// Query failures are swallowed; this only informs the failure report.
    async fn log_missing_output(&self, token: Address, account: Address, block: Option<u64>) {
        let Some(block) = block else {
            warn!("swap receipt carried no block number; skipping transfer-log diagnostics");
            return;
        };
        match self.ctx.chain.transfer_events_to(token, account, block).await {
            Ok(events) if events.is_empty() => {
                warn!(%token, block, "no transfer events to the account in the swap block");
            }
            Ok(events) => {
                let total: U256 = events.iter().map(|e| e.value).sum();
                warn!(
                    %token,
                    block,
                    count = events.len(),
                    %total,
                    "transfer events found despite zero balance reading; possible indexing delay"
                );
            }
            Err(err) => warn!(error = %err, "transfer-log diagnostic query failed"),
        }
    }

    fn quote_request(&self, request: &PayRequest) -> Result<QuoteRequest> {
        let sell_token = resolve_quote_address(&request.sell_symbol)?;
        let buy_token = resolve_quote_address(&request.buy_symbol)?;
        let decimals = resolve_decimals(&request.sell_symbol)?;
        let sell_amount = parse_amount(&request.amount, decimals)?;

        Ok(QuoteRequest {
            sell_token,
            buy_token,
            sell_amount,
            taker: self.ctx.account(),
            slippage_bps: request.slippage_bps,
            chain_id: self.ctx.required_chain_id,
        })
    }
}

fn no_output(token: Address) -> Error {
    ExecutionError::NoOutputReceived { token }.into()
}

/// Poll the buy-token balance until it is nonzero or the budget is
/// exhausted, returning the last observed value.
///
/// Exposed for callers that confirm balances outside the full flow.
///
/// # Errors
///
/// Propagates balance-read failures immediately.
pub async fn confirm_balance(
    chain: &dyn crate::port::ChainReader,
    token: Address,
    account: Address,
) -> Result<U256> {
    retry_until(
        BALANCE_POLL_ATTEMPTS,
        BALANCE_POLL_DELAY,
        || chain.balance_of(token, account),
        |balance| !balance.is_zero(),
    )
    .await
}
