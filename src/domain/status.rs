//! Orchestration phases and their user-facing status lines.

use alloy_primitives::{TxHash, U256};

/// Phase of one swap-and-pay orchestration.
///
/// Every transition is pushed through the configured
/// [`StatusSink`](crate::port::StatusSink). Phases that follow a submitted
/// transaction carry its hash, so partial progress remains visible if a
/// later step fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapPhase {
    Init,
    NetworkCheck,
    Approving,
    AwaitingApproveConfirm { tx_hash: TxHash },
    Swapping,
    AwaitingSwapConfirm { tx_hash: TxHash },
    ConfirmingBalance,
    Transferring { amount: U256 },
    Done,
    Failed { message: String },
}

impl std::fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "Preparing execution"),
            Self::NetworkCheck => write!(f, "Checking network"),
            Self::Approving => write!(f, "Checking spending allowance"),
            Self::AwaitingApproveConfirm { tx_hash } => {
                write!(f, "Waiting for approval confirmation ({tx_hash})")
            }
            Self::Swapping => write!(f, "Submitting swap"),
            Self::AwaitingSwapConfirm { tx_hash } => {
                write!(f, "Waiting for swap confirmation ({tx_hash})")
            }
            Self::ConfirmingBalance => write!(f, "Confirming received balance"),
            Self::Transferring { amount } => {
                write!(f, "Forwarding {amount} base units to receiver")
            }
            Self::Done => write!(f, "Swap and pay complete"),
            Self::Failed { message } => write!(f, "Failed: {message}"),
        }
    }
}
