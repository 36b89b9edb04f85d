//! EVM adapters: chain reads, local-signer wallet, network switching.

pub mod chain;
pub mod network;
pub mod wallet;

pub use chain::EvmChain;
pub use network::WalletRpcSwitch;
pub use wallet::LocalWallet;
