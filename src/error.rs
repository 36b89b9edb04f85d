use alloy_primitives::Address;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("quote endpoint '{url}' does not end with the expected '{expected}' path")]
    QuotePath { url: String, expected: &'static str },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while fetching or normalizing quotes.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The quote service answered with a non-success status. The message
    /// carries the service-provided reason and any field-level validation
    /// details, or the raw body when it is not JSON.
    #[error("quote service error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("quote field '{field}' is not a valid 20-byte address: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("malformed quote payload: {reason}")]
    MalformedPayload { reason: String },
}

/// Errors raised by the token registry.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("unsupported token symbol: {0}")]
    UnknownSymbol(String),

    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
}

/// Execution-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("no chain client available")]
    NoChainClient,

    #[error("no connected account; provide a signing capability")]
    NoAccount,

    #[error("refusing to submit swap: malformed target address {target}")]
    InvalidTarget { target: Address },

    #[error("no {token} balance received after the swap; check tokens, decimals, and slippage")]
    NoOutputReceived { token: Address },

    #[error("chain read failed: {0}")]
    ChainRead(String),

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),

    #[error("failed to switch to chain {chain_id}: {reason}")]
    NetworkSwitchFailed { chain_id: u64, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
