//! Ports: the seams between the orchestration engine and its collaborators.
//!
//! Adapters implement these traits; the engine only ever sees the traits.
//! Implementations must be thread-safe (`Send + Sync`).

pub mod chain;
pub mod network;
pub mod quote;
pub mod status;
pub mod wallet;

pub use chain::{ChainReader, TransferEvent, TxReceipt};
pub use network::NetworkSwitch;
pub use quote::SwapQuoter;
pub use status::{NullSink, StatusSink};
pub use wallet::{ContractWriteWallet, RawSubmitWallet, SigningCapability};
