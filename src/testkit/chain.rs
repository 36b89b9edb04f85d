//! Scripted [`ChainReader`] double.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::error::{ExecutionError, Result};
use crate::port::{ChainReader, TransferEvent, TxReceipt};

/// Chain double with scripted responses and call counters.
///
/// Balance readings are consumed front-to-back; once the script is
/// exhausted the last reading repeats (an empty script reads zero forever).
pub struct ScriptedChain {
    chain_id: u64,
    allowance: Mutex<U256>,
    balances: Mutex<VecDeque<U256>>,
    last_balance: Mutex<U256>,
    receipt_block: Option<u64>,
    transfer_events: Vec<TransferEvent>,
    fail_transfer_events: bool,
    balance_reads: AtomicU32,
    allowance_reads: AtomicU32,
    receipt_waits: Mutex<Vec<TxHash>>,
}

impl ScriptedChain {
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            allowance: Mutex::new(U256::ZERO),
            balances: Mutex::new(VecDeque::new()),
            last_balance: Mutex::new(U256::ZERO),
            receipt_block: Some(1),
            transfer_events: Vec::new(),
            fail_transfer_events: false,
            balance_reads: AtomicU32::new(0),
            allowance_reads: AtomicU32::new(0),
            receipt_waits: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_allowance(self, allowance: U256) -> Self {
        *self.allowance.lock().unwrap() = allowance;
        self
    }

    /// Script the successive balance readings.
    #[must_use]
    pub fn with_balances<I: IntoIterator<Item = U256>>(self, balances: I) -> Self {
        *self.balances.lock().unwrap() = balances.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_receipt_block(mut self, block: Option<u64>) -> Self {
        self.receipt_block = block;
        self
    }

    #[must_use]
    pub fn with_transfer_events(mut self, events: Vec<TransferEvent>) -> Self {
        self.transfer_events = events;
        self
    }

    /// Make the diagnostic transfer-event query fail.
    #[must_use]
    pub fn with_failing_transfer_events(mut self) -> Self {
        self.fail_transfer_events = true;
        self
    }

    #[must_use]
    pub fn balance_reads(&self) -> u32 {
        self.balance_reads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn allowance_reads(&self) -> u32 {
        self.allowance_reads.load(Ordering::SeqCst)
    }

    /// Hashes passed to `wait_for_receipt`, in order.
    #[must_use]
    pub fn receipt_waits(&self) -> Vec<TxHash> {
        self.receipt_waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainReader for ScriptedChain {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256> {
        self.allowance_reads.fetch_add(1, Ordering::SeqCst);
        Ok(*self.allowance.lock().unwrap())
    }

    async fn balance_of(&self, _token: Address, _account: Address) -> Result<U256> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        let mut script = self.balances.lock().unwrap();
        let mut last = self.last_balance.lock().unwrap();
        if let Some(next) = script.pop_front() {
            *last = next;
        }
        Ok(*last)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        self.receipt_waits.lock().unwrap().push(tx_hash);
        Ok(TxReceipt {
            tx_hash,
            block_number: self.receipt_block,
        })
    }

    async fn transfer_events_to(
        &self,
        _token: Address,
        to: Address,
        _block: u64,
    ) -> Result<Vec<TransferEvent>> {
        if self.fail_transfer_events {
            return Err(ExecutionError::ChainRead("scripted log failure".into()).into());
        }
        Ok(self
            .transfer_events
            .iter()
            .filter(|e| e.to == to)
            .copied()
            .collect())
    }
}
