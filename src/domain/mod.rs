//! Exchange-agnostic domain types: tokens, quotes, swap parameters, and
//! orchestration phases.

pub mod erc20;
pub mod quote;
pub mod status;
pub mod token;

pub use quote::{
    AllowanceDecision, AutoApprove, Price, Quote, QuoteRequest, SwapAndPayParams, SwapAndPayResult,
};
pub use status::SwapPhase;
pub use token::Token;
