//! ERC-20 allowance management and capability-dispatched writes.

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::domain::erc20::IERC20;
use crate::domain::AllowanceDecision;
use crate::error::Result;
use crate::port::{ChainReader, SigningCapability};

/// Ensure `spender` may move at least `required` of `token` on behalf of
/// `owner`.
///
/// Reads the current on-chain allowance on every call (never cached). When
/// sufficient, returns `{approved: true}` without submitting anything.
/// Otherwise submits an approval for `required` when `use_exact` is true,
/// or for `U256::MAX` when false: the infinite default trades one signature
/// now for none on later operations, so callers wanting tighter permission
/// pass `use_exact: true`.
///
/// Does not wait for the approval to be mined; the caller decides whether
/// and when to await the returned hash.
///
/// # Errors
///
/// Returns an error if the allowance read or the approval submission fails.
pub async fn ensure_allowance(
    chain: &dyn ChainReader,
    wallet: &SigningCapability,
    token: Address,
    owner: Address,
    spender: Address,
    required: U256,
    use_exact: bool,
) -> Result<AllowanceDecision> {
    let current = chain.allowance(token, owner, spender).await?;
    if current >= required {
        debug!(%token, %spender, %current, %required, "allowance sufficient");
        return Ok(AllowanceDecision {
            approved: true,
            tx_hash: None,
        });
    }

    let amount = if use_exact { required } else { U256::MAX };
    let tx_hash = send_approve(wallet, token, spender, amount).await?;
    info!(%token, %spender, %amount, %tx_hash, "approval submitted");

    Ok(AllowanceDecision {
        approved: false,
        tx_hash: Some(tx_hash),
    })
}

/// Submit `approve(spender, amount)` on `token`, dispatching on the signing
/// capability variant.
pub async fn send_approve(
    wallet: &SigningCapability,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TxHash> {
    match wallet {
        SigningCapability::ContractWrite(w) => w.write_approve(token, spender, amount).await,
        SigningCapability::RawSubmit(w) => {
            let data = IERC20::approveCall { spender, amount }.abi_encode();
            w.send_transaction(token, data.into(), U256::ZERO).await
        }
    }
}

/// Submit `transfer(to, amount)` on `token`, dispatching on the signing
/// capability variant.
pub async fn send_transfer(
    wallet: &SigningCapability,
    token: Address,
    to: Address,
    amount: U256,
) -> Result<TxHash> {
    match wallet {
        SigningCapability::ContractWrite(w) => w.write_transfer(token, to, amount).await,
        SigningCapability::RawSubmit(w) => {
            let data = IERC20::transferCall { to, amount }.abi_encode();
            w.send_transaction(token, data.into(), U256::ZERO).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::address;

    use super::*;
    use crate::port::RawSubmitWallet;
    use crate::testkit::chain::ScriptedChain;
    use crate::testkit::wallet::{RecordingWallet, Submission};

    const TOKEN: Address = address!("760AfE86e5de5fa0Ee542fc7B7B713e1c5425701");
    const SPENDER: Address = address!("00000000000000000000000000000000000aaaaa");

    fn contract_wallet() -> (Arc<RecordingWallet>, SigningCapability) {
        let wallet = Arc::new(RecordingWallet::new());
        let capability = SigningCapability::ContractWrite(wallet.clone());
        (wallet, capability)
    }

    // -------------------------------------------------------------------------
    // ensure_allowance
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn sufficient_allowance_submits_nothing() {
        let chain = ScriptedChain::new(10143).with_allowance(U256::from(1_000u64));
        let (wallet, capability) = contract_wallet();

        let decision = ensure_allowance(
            &chain,
            &capability,
            TOKEN,
            wallet.address(),
            SPENDER,
            U256::from(500u64),
            false,
        )
        .await
        .unwrap();

        assert!(decision.approved);
        assert_eq!(decision.tx_hash, None);
        assert!(wallet.submissions().is_empty());
    }

    #[tokio::test]
    async fn exact_boundary_counts_as_sufficient() {
        let chain = ScriptedChain::new(10143).with_allowance(U256::from(500u64));
        let (wallet, capability) = contract_wallet();

        let decision = ensure_allowance(
            &chain,
            &capability,
            TOKEN,
            wallet.address(),
            SPENDER,
            U256::from(500u64),
            false,
        )
        .await
        .unwrap();

        assert!(decision.approved);
        assert!(wallet.submissions().is_empty());
    }

    #[tokio::test]
    async fn insufficient_allowance_approves_max_by_default() {
        let chain = ScriptedChain::new(10143).with_allowance(U256::ZERO);
        let (wallet, capability) = contract_wallet();

        let decision = ensure_allowance(
            &chain,
            &capability,
            TOKEN,
            wallet.address(),
            SPENDER,
            U256::from(500u64),
            false,
        )
        .await
        .unwrap();

        assert!(!decision.approved);
        assert!(decision.tx_hash.is_some());
        match wallet.submissions().as_slice() {
            [Submission::Approve {
                token,
                spender,
                amount,
            }] => {
                assert_eq!(*token, TOKEN);
                assert_eq!(*spender, SPENDER);
                // Independent of the required amount.
                assert_eq!(*amount, U256::MAX);
            }
            other => panic!("expected one approve submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn use_exact_approves_the_required_amount() {
        let chain = ScriptedChain::new(10143).with_allowance(U256::ZERO);
        let (wallet, capability) = contract_wallet();

        let decision = ensure_allowance(
            &chain,
            &capability,
            TOKEN,
            wallet.address(),
            SPENDER,
            U256::from(500u64),
            true,
        )
        .await
        .unwrap();

        assert!(!decision.approved);
        match wallet.submissions().as_slice() {
            [Submission::Approve { amount, .. }] => assert_eq!(*amount, U256::from(500u64)),
            other => panic!("expected one approve submission, got {other:?}"),
        }
    }

    // -------------------------------------------------------------------------
    // Capability dispatch
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn raw_variant_encodes_approve_calldata() {
        let wallet = Arc::new(RecordingWallet::new());
        let capability = SigningCapability::RawSubmit(wallet.clone());

        send_approve(&capability, TOKEN, SPENDER, U256::MAX)
            .await
            .unwrap();

        match wallet.submissions().as_slice() {
            [Submission::Raw { to, data, value }] => {
                assert_eq!(*to, TOKEN);
                assert_eq!(*value, U256::ZERO);
                let expected = IERC20::approveCall {
                    spender: SPENDER,
                    amount: U256::MAX,
                }
                .abi_encode();
                assert_eq!(data.as_ref(), expected.as_slice());
            }
            other => panic!("expected one raw submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn raw_variant_encodes_transfer_calldata() {
        let wallet = Arc::new(RecordingWallet::new());
        let capability = SigningCapability::RawSubmit(wallet.clone());
        let receiver = address!("00000000000000000000000000000000000bbbbb");

        send_transfer(&capability, TOKEN, receiver, U256::from(5_000_000u64))
            .await
            .unwrap();

        match wallet.submissions().as_slice() {
            [Submission::Raw { to, data, .. }] => {
                assert_eq!(*to, TOKEN);
                let expected = IERC20::transferCall {
                    to: receiver,
                    amount: U256::from(5_000_000u64),
                }
                .abi_encode();
                assert_eq!(data.as_ref(), expected.as_slice());
            }
            other => panic!("expected one raw submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn contract_variant_uses_typed_writes() {
        let (wallet, capability) = contract_wallet();

        send_transfer(&capability, TOKEN, SPENDER, U256::from(1u64))
            .await
            .unwrap();

        match wallet.submissions().as_slice() {
            [Submission::Transfer { token, to, amount }] => {
                assert_eq!(*token, TOKEN);
                assert_eq!(*to, SPENDER);
                assert_eq!(*amount, U256::from(1u64));
            }
            other => panic!("expected one typed transfer, got {other:?}"),
        }
    }
}
