//! End-to-end orchestration flows against testkit doubles.

use std::sync::Arc;

use alloy_primitives::{address, Address, Bytes, B256, U256};
use async_trait::async_trait;

use kiosko::app::{ExecutionContext, PayRequest, SwapPay};
use kiosko::domain::token;
use kiosko::domain::{Quote, SwapAndPayParams, SwapPhase};
use kiosko::error::{Error, ExecutionError, Result};
use kiosko::port::{NetworkSwitch, RawSubmitWallet as _, SigningCapability, TransferEvent};
use kiosko::testkit::chain::ScriptedChain;
use kiosko::testkit::quote::StaticQuoter;
use kiosko::testkit::status::RecordingSink;
use kiosko::testkit::wallet::{RecordingWallet, Submission};

const CHAIN_ID: u64 = 10143;
const SETTLEMENT: Address = address!("00000000000000000000000000000000000de90a");
const ALLOWANCE_TARGET: Address = address!("00000000000000000000000000000000000aaaaa");
const RECEIVER: Address = address!("00000000000000000000000000000000000bbbbb");

fn wmon() -> Address {
    token::by_symbol("WMON").unwrap().address
}

fn usdc() -> Address {
    token::by_symbol("USDC").unwrap().address
}

/// A checkout-shaped quote: sell 0.01 WMON, receive 5 USDC
/// (6 decimals), allowance target set.
fn scenario_quote() -> Quote {
    Quote {
        to: SETTLEMENT,
        data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
        value: None,
        buy_amount: U256::from(5_000_000u64),
        allowance_target: Some(ALLOWANCE_TARGET),
        shape: "flat",
    }
}

fn pay_request() -> PayRequest {
    PayRequest {
        sell_symbol: "WMON".into(),
        buy_symbol: "USDC".into(),
        amount: "0.01".into(),
        receiver: RECEIVER,
        slippage_bps: 100,
        use_exact_approval: false,
    }
}

struct Harness {
    chain: Arc<ScriptedChain>,
    wallet: Arc<RecordingWallet>,
    sink: Arc<RecordingSink>,
    engine: SwapPay<StaticQuoter>,
}

fn harness(chain: ScriptedChain, quote: Quote) -> Harness {
    let chain = Arc::new(chain);
    let wallet = Arc::new(RecordingWallet::new());
    let sink = Arc::new(RecordingSink::new());
    let ctx = ExecutionContext::builder()
        .chain(chain.clone())
        .wallet(SigningCapability::ContractWrite(wallet.clone()))
        .status(sink.clone())
        .required_chain_id(CHAIN_ID)
        .build()
        .unwrap();
    let engine = SwapPay::new(ctx, StaticQuoter::default().with_quote(quote));
    Harness {
        chain,
        wallet,
        sink,
        engine,
    }
}

// -----------------------------------------------------------------------------
// Full flow: approval needed, swap, first poll succeeds, transfer
// -----------------------------------------------------------------------------

#[tokio::test]
async fn full_flow_with_approval() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::ZERO)
            .with_balances([U256::from(5_000_000u64)]),
        scenario_quote(),
    );

    let result = h.engine.execute(&pay_request()).await.unwrap();

    let submissions = h.wallet.submissions();
    assert_eq!(submissions.len(), 3, "approve, swap, transfer");
    assert_eq!(
        submissions[0],
        Submission::Approve {
            token: wmon(),
            spender: ALLOWANCE_TARGET,
            amount: U256::MAX,
        }
    );
    assert_eq!(
        submissions[1],
        Submission::Raw {
            to: SETTLEMENT,
            data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            value: U256::ZERO,
        }
    );
    assert_eq!(
        submissions[2],
        Submission::Transfer {
            token: usdc(),
            to: RECEIVER,
            amount: U256::from(5_000_000u64),
        }
    );

    // The approval and the swap are both awaited; the transfer is not.
    assert_eq!(
        h.chain.receipt_waits(),
        vec![B256::with_last_byte(1), B256::with_last_byte(2)]
    );

    assert_eq!(result.swap_hash, B256::with_last_byte(2));
    assert_eq!(result.transfer_hash, B256::with_last_byte(3));

    // First poll already saw the balance.
    assert_eq!(h.chain.balance_reads(), 1);
    assert!(h.sink.saw(|p| matches!(p, SwapPhase::Done)));
}

// -----------------------------------------------------------------------------
// Allowance already sufficient
// -----------------------------------------------------------------------------

#[tokio::test]
async fn sufficient_allowance_skips_approval() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(5_000_000u64)]),
        scenario_quote(),
    );

    let result = h.engine.execute(&pay_request()).await.unwrap();

    let submissions = h.wallet.submissions();
    assert_eq!(submissions.len(), 2, "swap and transfer only");
    assert!(matches!(submissions[0], Submission::Raw { .. }));
    assert!(matches!(submissions[1], Submission::Transfer { .. }));

    // Only the swap receipt is awaited.
    assert_eq!(h.chain.receipt_waits(), vec![B256::with_last_byte(1)]);
    assert_eq!(result.swap_hash, B256::with_last_byte(1));
}

#[tokio::test]
async fn missing_allowance_target_skips_approval() {
    let quote = Quote {
        allowance_target: None,
        ..scenario_quote()
    };
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::ZERO)
            .with_balances([U256::from(5_000_000u64)]),
        quote,
    );

    h.engine.execute(&pay_request()).await.unwrap();

    assert_eq!(h.chain.allowance_reads(), 0);
    assert_eq!(h.wallet.submissions().len(), 2);
}

// -----------------------------------------------------------------------------
// Balance never materializes
// -----------------------------------------------------------------------------

#[tokio::test]
async fn exhausted_polling_fails_without_transfer() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID).with_allowance(U256::MAX),
        scenario_quote(),
    );

    let err = h.engine.execute(&pay_request()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::NoOutputReceived { .. })
    ));

    // Exactly six polls, then no transfer was ever submitted.
    assert_eq!(h.chain.balance_reads(), 6);
    let submissions = h.wallet.submissions();
    assert_eq!(submissions.len(), 1, "only the swap was submitted");
    assert!(matches!(submissions[0], Submission::Raw { .. }));

    // The swap hash stayed visible through the status side-channel.
    assert!(h.sink.saw(|p| matches!(
        p,
        SwapPhase::AwaitingSwapConfirm { tx_hash } if *tx_hash == B256::with_last_byte(1)
    )));
    assert!(h.sink.saw(|p| matches!(p, SwapPhase::Failed { .. })));
}

#[tokio::test]
async fn diagnostic_log_failure_is_swallowed() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_failing_transfer_events(),
        scenario_quote(),
    );

    let err = h.engine.execute(&pay_request()).await.unwrap_err();
    // Still the balance failure, not the scripted log failure.
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::NoOutputReceived { .. })
    ));
}

#[tokio::test]
async fn diagnostic_log_events_do_not_rescue_the_flow() {
    let wallet_address = RecordingWallet::new().address();
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_transfer_events(vec![TransferEvent {
                from: SETTLEMENT,
                to: wallet_address,
                value: U256::from(5_000_000u64),
            }]),
        scenario_quote(),
    );

    let err = h.engine.execute(&pay_request()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::NoOutputReceived { .. })
    ));
}

// -----------------------------------------------------------------------------
// Transfer clamping
// -----------------------------------------------------------------------------

async fn run_clamp(observed: u64, expected: u64) -> Result<Vec<Submission>> {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(observed)]),
        Quote {
            buy_amount: U256::from(expected),
            ..scenario_quote()
        },
    );

    let params = SwapAndPayParams {
        quote: Quote {
            buy_amount: U256::from(expected),
            ..scenario_quote()
        },
        receiver: RECEIVER,
        buy_token: usdc(),
        auto_approve: None,
    };
    h.engine.swap_and_pay(params).await?;
    Ok(h.wallet.submissions())
}

#[tokio::test]
async fn transfer_is_clamped_to_the_smaller_amount() {
    // Observed below quoted: slippage ate into the output.
    match run_clamp(3_000_000, 5_000_000).await.unwrap().as_slice() {
        [_, Submission::Transfer { amount, .. }] => assert_eq!(*amount, U256::from(3_000_000u64)),
        other => panic!("unexpected submissions: {other:?}"),
    }

    // Observed above quoted: pre-existing balance stays put.
    match run_clamp(9_000_000, 5_000_000).await.unwrap().as_slice() {
        [_, Submission::Transfer { amount, .. }] => assert_eq!(*amount, U256::from(5_000_000u64)),
        other => panic!("unexpected submissions: {other:?}"),
    }

    // Equality forwards exactly the quoted amount.
    match run_clamp(5_000_000, 5_000_000).await.unwrap().as_slice() {
        [_, Submission::Transfer { amount, .. }] => assert_eq!(*amount, U256::from(5_000_000u64)),
        other => panic!("unexpected submissions: {other:?}"),
    }
}

#[tokio::test]
async fn zero_quoted_amount_never_transfers() {
    // Nonzero balance but a zero quote clamps to zero and fails.
    let err = run_clamp(5_000_000, 0).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::NoOutputReceived { .. })
    ));
}

// -----------------------------------------------------------------------------
// Validation gate
// -----------------------------------------------------------------------------

#[tokio::test]
async fn zero_target_address_is_rejected_before_submission() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(5_000_000u64)]),
        Quote {
            to: Address::ZERO,
            ..scenario_quote()
        },
    );

    let err = h.engine.execute(&pay_request()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::InvalidTarget { .. })
    ));
    assert!(h.wallet.submissions().is_empty());
}

// -----------------------------------------------------------------------------
// Network alignment
// -----------------------------------------------------------------------------

struct ScriptedSwitch {
    succeed: bool,
    calls: std::sync::atomic::AtomicU32,
}

impl ScriptedSwitch {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkSwitch for ScriptedSwitch {
    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            Err(ExecutionError::NetworkSwitchFailed {
                chain_id,
                reason: "unsupported method".into(),
            }
            .into())
        }
    }
}

#[tokio::test]
async fn failed_network_switch_is_not_fatal() {
    let chain = Arc::new(
        // Connected to the wrong chain.
        ScriptedChain::new(1)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(5_000_000u64)]),
    );
    let wallet = Arc::new(RecordingWallet::new());
    let primary = Arc::new(ScriptedSwitch::new(false));
    let fallback = Arc::new(ScriptedSwitch::new(false));

    let ctx = ExecutionContext::builder()
        .chain(chain)
        .wallet(SigningCapability::ContractWrite(wallet.clone()))
        .network_switch(primary.clone())
        .wallet_network_switch(fallback.clone())
        .required_chain_id(CHAIN_ID)
        .build()
        .unwrap();
    let engine = SwapPay::new(ctx, StaticQuoter::default().with_quote(scenario_quote()));

    // Both capabilities were tried, then the flow carried on and succeeded.
    engine.execute(&pay_request()).await.unwrap();
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test]
async fn successful_primary_switch_skips_the_fallback() {
    let chain = Arc::new(
        ScriptedChain::new(1)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(5_000_000u64)]),
    );
    let wallet = Arc::new(RecordingWallet::new());
    let primary = Arc::new(ScriptedSwitch::new(true));
    let fallback = Arc::new(ScriptedSwitch::new(true));

    let ctx = ExecutionContext::builder()
        .chain(chain)
        .wallet(SigningCapability::ContractWrite(wallet.clone()))
        .network_switch(primary.clone())
        .wallet_network_switch(fallback.clone())
        .required_chain_id(CHAIN_ID)
        .build()
        .unwrap();
    let engine = SwapPay::new(ctx, StaticQuoter::default().with_quote(scenario_quote()));

    engine.execute(&pay_request()).await.unwrap();
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn matching_chain_requests_no_switch() {
    let chain = Arc::new(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::MAX)
            .with_balances([U256::from(5_000_000u64)]),
    );
    let wallet = Arc::new(RecordingWallet::new());
    let primary = Arc::new(ScriptedSwitch::new(true));

    let ctx = ExecutionContext::builder()
        .chain(chain)
        .wallet(SigningCapability::ContractWrite(wallet.clone()))
        .network_switch(primary.clone())
        .required_chain_id(CHAIN_ID)
        .build()
        .unwrap();
    let engine = SwapPay::new(ctx, StaticQuoter::default().with_quote(scenario_quote()));

    engine.execute(&pay_request()).await.unwrap();
    assert_eq!(primary.calls(), 0);
}

// -----------------------------------------------------------------------------
// Failure surfacing
// -----------------------------------------------------------------------------

#[tokio::test]
async fn rejected_submission_surfaces_the_native_message() {
    let chain = Arc::new(ScriptedChain::new(CHAIN_ID).with_allowance(U256::MAX));
    let wallet = Arc::new(RecordingWallet::failing());
    let sink = Arc::new(RecordingSink::new());

    let ctx = ExecutionContext::builder()
        .chain(chain)
        .wallet(SigningCapability::ContractWrite(wallet))
        .status(sink.clone())
        .required_chain_id(CHAIN_ID)
        .build()
        .unwrap();
    let engine = SwapPay::new(ctx, StaticQuoter::default().with_quote(scenario_quote()));

    let err = engine.execute(&pay_request()).await.unwrap_err();
    assert!(err.to_string().contains("user rejected the request"));

    // The terminal status carries the same displayable message.
    assert!(sink.saw(|p| matches!(
        p,
        SwapPhase::Failed { message } if message.contains("user rejected the request")
    )));
}

// -----------------------------------------------------------------------------
// Phase ordering
// -----------------------------------------------------------------------------

#[tokio::test]
async fn phases_progress_in_order_on_success() {
    let h = harness(
        ScriptedChain::new(CHAIN_ID)
            .with_allowance(U256::ZERO)
            .with_balances([U256::from(5_000_000u64)]),
        scenario_quote(),
    );

    h.engine.execute(&pay_request()).await.unwrap();

    let phases = h.sink.phases();
    let expect = [
        "Init",
        "NetworkCheck",
        "Approving",
        "AwaitingApproveConfirm",
        "Swapping",
        "AwaitingSwapConfirm",
        "ConfirmingBalance",
        "Transferring",
        "Done",
    ];
    assert_eq!(phases.len(), expect.len());
    for (phase, name) in phases.iter().zip(expect) {
        let tag = format!("{phase:?}");
        assert!(tag.starts_with(name), "expected {name}, got {tag}");
    }
}
