//! Canned [`SwapQuoter`] double.

use async_trait::async_trait;

use crate::domain::{Price, Quote, QuoteRequest};
use crate::error::{QuoteError, Result};
use crate::port::SwapQuoter;

/// Quoter returning fixed responses.
#[derive(Default)]
pub struct StaticQuoter {
    price: Option<Price>,
    quote: Option<Quote>,
}

impl StaticQuoter {
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = Some(quote);
        self
    }
}

#[async_trait]
impl SwapQuoter for StaticQuoter {
    async fn price(&self, _request: &QuoteRequest) -> Result<Price> {
        self.price.clone().ok_or_else(|| {
            QuoteError::Upstream {
                status: 500,
                message: "no scripted price".into(),
            }
            .into()
        })
    }

    async fn quote(&self, _request: &QuoteRequest) -> Result<Quote> {
        self.quote.clone().ok_or_else(|| {
            QuoteError::Upstream {
                status: 500,
                message: "no scripted quote".into(),
            }
            .into()
        })
    }
}
