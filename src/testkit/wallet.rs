//! Recording wallet double implementing both capability variants.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use alloy_primitives::{address, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;

use crate::error::{ExecutionError, Result};
use crate::port::{ContractWriteWallet, RawSubmitWallet};

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Transfer {
        token: Address,
        to: Address,
        amount: U256,
    },
    Raw {
        to: Address,
        data: Bytes,
        value: U256,
    },
}

/// Wallet double that records submissions and hands out deterministic
/// hashes (`0x…01`, `0x…02`, …) in submission order.
pub struct RecordingWallet {
    address: Address,
    submissions: Mutex<Vec<Submission>>,
    next_hash: AtomicU8,
    fail_submissions: bool,
}

impl Default for RecordingWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingWallet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: address!("00000000000000000000000000000000000caf3e"),
            submissions: Mutex::new(Vec::new()),
            next_hash: AtomicU8::new(1),
            fail_submissions: false,
        }
    }

    /// Make every submission fail with a native-style message.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_submissions: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn record(&self, submission: Submission) -> Result<TxHash> {
        if self.fail_submissions {
            return Err(
                ExecutionError::SubmissionFailed("user rejected the request".into()).into(),
            );
        }
        self.submissions.lock().unwrap().push(submission);
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst);
        Ok(B256::with_last_byte(n))
    }
}

#[async_trait]
impl RawSubmitWallet for RecordingWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash> {
        self.record(Submission::Raw { to, data, value })
    }
}

#[async_trait]
impl ContractWriteWallet for RecordingWallet {
    async fn write_approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.record(Submission::Approve {
            token,
            spender,
            amount,
        })
    }

    async fn write_transfer(&self, token: Address, to: Address, amount: U256) -> Result<TxHash> {
        self.record(Submission::Transfer { token, to, amount })
    }
}
