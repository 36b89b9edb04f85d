//! Quote service port.

use async_trait::async_trait;

use crate::domain::{Price, Quote, QuoteRequest};
use crate::error::Result;

/// Fetches indicative prices and executable quotes from the external
/// price-aggregation service. Implementations never retry automatically.
#[async_trait]
pub trait SwapQuoter: Send + Sync {
    /// Indicative preview without call data.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-success responses.
    async fn price(&self, request: &QuoteRequest) -> Result<Price>;

    /// Executable quote with call payload and allowance target.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-success responses, or
    /// payloads that cannot be normalized.
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote>;
}
