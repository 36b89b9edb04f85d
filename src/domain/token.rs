//! Static token registry for the Monad testnet deployment.
//!
//! The registry maps symbols to addresses and decimals, and resolves the
//! native-asset symbol to its wrapped ERC-20 equivalent: the quote service
//! only understands ERC-20 addresses, so `MON` is spoken for by `WMON`.

use alloy_primitives::{
    address,
    utils::{parse_units, ParseUnits},
    Address, U256,
};

use crate::error::{Result, TokenError};

/// Symbol of the native asset. Its zero address is display-only and never
/// sent to the quote service.
pub const NATIVE_SYMBOL: &str = "MON";

/// Symbol of the wrapped ERC-20 equivalent of the native asset.
pub const WRAPPED_NATIVE_SYMBOL: &str = "WMON";

/// An immutable registry entry. `decimals` governs conversion between
/// human-entered amounts and base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: Address,
    pub decimals: u8,
}

/// Supported tokens on Monad testnet.
pub static TOKENS: &[Token] = &[
    Token {
        symbol: NATIVE_SYMBOL,
        name: "Monad Native Token",
        address: Address::ZERO,
        decimals: 18,
    },
    Token {
        symbol: WRAPPED_NATIVE_SYMBOL,
        name: "Wrapped MON",
        address: address!("760AfE86e5de5fa0Ee542fc7B7B713e1c5425701"),
        decimals: 18,
    },
    Token {
        symbol: "USDC",
        name: "USD Coin",
        address: address!("f817257fed379853cDe0fa4F97AB987181B1E5Ea"),
        decimals: 6,
    },
    Token {
        symbol: "USDT",
        name: "Tether USD",
        address: address!("88b8E2161DEDC77EF4ab7585569D2415a1C1055D"),
        decimals: 6,
    },
    Token {
        symbol: "WETH",
        name: "Wrapped Ether",
        address: address!("B5a30b0FDc5EA94A52fDc42e3E9760Cb8449Fb37"),
        decimals: 18,
    },
];

/// Look up a token by its symbol.
#[must_use]
pub fn by_symbol(symbol: &str) -> Option<&'static Token> {
    TOKENS.iter().find(|t| t.symbol == symbol)
}

/// Resolve the address to use when talking to the quote service.
///
/// The native symbol resolves to the wrapped token's address; any ERC-20
/// symbol resolves to its own address.
///
/// # Errors
///
/// Returns [`TokenError::UnknownSymbol`] for symbols not in the registry.
pub fn resolve_quote_address(symbol: &str) -> Result<Address> {
    let effective = if symbol == NATIVE_SYMBOL {
        WRAPPED_NATIVE_SYMBOL
    } else {
        symbol
    };
    by_symbol(effective)
        .map(|t| t.address)
        .ok_or_else(|| TokenError::UnknownSymbol(symbol.to_string()).into())
}

/// Return the decimals that apply when converting a human-entered amount
/// for `symbol` to base units.
///
/// # Errors
///
/// Returns [`TokenError::UnknownSymbol`] for symbols not in the registry.
pub fn resolve_decimals(symbol: &str) -> Result<u8> {
    let effective = if symbol == NATIVE_SYMBOL {
        WRAPPED_NATIVE_SYMBOL
    } else {
        symbol
    };
    by_symbol(effective)
        .map(|t| t.decimals)
        .ok_or_else(|| TokenError::UnknownSymbol(symbol.to_string()).into())
}

/// Convert a human-entered decimal amount (e.g. `"0.01"`) to base units.
///
/// # Errors
///
/// Returns [`TokenError::InvalidAmount`] when the string is not a
/// non-negative decimal number representable in `decimals` places.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount, decimals).map_err(|e| TokenError::InvalidAmount {
        value: amount.to_string(),
        reason: e.to_string(),
    })?;
    match parsed {
        ParseUnits::U256(units) => Ok(units),
        ParseUnits::I256(_) => Err(TokenError::InvalidAmount {
            value: amount.to_string(),
            reason: "amount must be non-negative".into(),
        }
        .into()),
    }
}
