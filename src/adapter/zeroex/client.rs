//! HTTP client for the quote service.
//!
//! Requests go through a forwarding proxy that injects the aggregator's
//! credentials, so no API key ever lives in this process. The proxy is
//! configured with its `/quote` URL; the `/price` URL is derived from it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};
use url::Url;

use super::dto;
use crate::config::QuoteConfig;
use crate::domain::{Price, Quote, QuoteRequest};
use crate::error::{ConfigError, QuoteError, Result};
use crate::port::SwapQuoter;

/// Path suffix the configured proxy endpoint must carry.
pub const QUOTE_PATH_SUFFIX: &str = "/quote";

/// Client for the aggregator's price and quote endpoints.
///
/// Never retries automatically: a stale quote is worse than a failed one.
#[derive(Debug)]
pub struct ZeroExClient {
    http: HttpClient,
    quote_url: Url,
    price_url: Url,
}

impl ZeroExClient {
    /// Create a client for the given proxy quote URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::QuotePath`] when the URL path does not end
    /// with [`QUOTE_PATH_SUFFIX`].
    pub fn new(quote_url: Url) -> Result<Self> {
        Self::with_http(HttpClient::new(), quote_url)
    }

    /// Create a client from configuration, applying HTTP timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable URL or path.
    pub fn from_config(config: &QuoteConfig) -> Result<Self> {
        let quote_url: Url = config.url.parse()?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self::with_http(http, quote_url)
    }

    fn with_http(http: HttpClient, quote_url: Url) -> Result<Self> {
        if !quote_url.path().ends_with(QUOTE_PATH_SUFFIX) {
            return Err(ConfigError::QuotePath {
                url: quote_url.to_string(),
                expected: QUOTE_PATH_SUFFIX,
            }
            .into());
        }
        let price_url = derive_price_url(&quote_url);
        Ok(Self {
            http,
            quote_url,
            price_url,
        })
    }

    fn request_url(&self, base: &Url, request: &QuoteRequest) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("sellToken", &request.sell_token.to_string())
            .append_pair("buyToken", &request.buy_token.to_string())
            .append_pair("sellAmount", &request.sell_amount.to_string())
            .append_pair("taker", &request.taker.to_string())
            .append_pair("recipient", &request.taker.to_string())
            .append_pair("slippageBps", &request.slippage_bps.to_string())
            .append_pair("chainId", &request.chain_id.to_string());
        url
    }

    async fn get_payload(&self, url: Url) -> Result<serde_json::Value> {
        debug!(%url, "fetching from quote service");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(QuoteError::Upstream {
                status: status.as_u16(),
                message: dto::upstream_message(&body),
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|_| {
            QuoteError::MalformedPayload {
                reason: "response body is not JSON".into(),
            }
            .into()
        })
    }
}

/// Replace the trailing `quote` path segment with `price`.
fn derive_price_url(quote_url: &Url) -> Url {
    let mut url = quote_url.clone();
    let path = url.path().to_string();
    if let Some(stem) = path.strip_suffix("quote") {
        url.set_path(&format!("{stem}price"));
    }
    url
}

#[async_trait]
impl SwapQuoter for ZeroExClient {
    async fn price(&self, request: &QuoteRequest) -> Result<Price> {
        let payload = self
            .get_payload(self.request_url(&self.price_url, request))
            .await?;
        dto::parse_price(&payload)
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        let payload = self
            .get_payload(self.request_url(&self.quote_url, request))
            .await?;
        let quote = dto::parse_quote(&payload)?;
        debug!(shape = quote.shape, to = %quote.to, "quote normalized");
        Ok(quote)
    }
}
