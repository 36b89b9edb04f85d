//! Quote service payload normalization.
//!
//! The aggregator has answered in more than one shape over time: flat
//! top-level `to`/`data` fields, or a nested `transaction` object with the
//! allowance target moved under `issues.allowance.spender`. Instead of
//! opportunistic field fallbacks, an ordered list of shape adapters is
//! tried; the first whose required fields are all present and non-empty
//! wins, and the matched shape is recorded on the quote for diagnostics.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Price, Quote};
use crate::error::{QuoteError, Result};

/// Raw string fields one shape adapter extracted from the payload.
struct ShapeFields {
    to: String,
    data: String,
    value: Option<String>,
    allowance_target: Option<String>,
}

type ShapeFn = fn(&Value) -> Option<ShapeFields>;

/// Known payload shapes, in priority order.
const QUOTE_SHAPES: &[(&str, ShapeFn)] = &[("flat", flat_shape), ("transaction", transaction_shape)];

fn non_empty_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flat_shape(payload: &Value) -> Option<ShapeFields> {
    Some(ShapeFields {
        to: non_empty_str(&payload["to"])?,
        data: non_empty_str(&payload["data"])?,
        value: non_empty_str(&payload["value"]),
        allowance_target: non_empty_str(&payload["allowanceTarget"]),
    })
}

fn transaction_shape(payload: &Value) -> Option<ShapeFields> {
    let tx = &payload["transaction"];
    Some(ShapeFields {
        to: non_empty_str(&tx["to"])?,
        data: non_empty_str(&tx["data"])?,
        value: non_empty_str(&tx["value"]),
        allowance_target: non_empty_str(&payload["allowanceTarget"])
            .or_else(|| non_empty_str(&payload["issues"]["allowance"]["spender"])),
    })
}

/// Normalize a hex address field.
///
/// A 42-character value passes through; a 66-character (32-byte,
/// left-padded) value is reduced to its trailing 40 hex characters; any
/// other shape is rejected naming the offending field.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidAddress`] for unusable values.
pub fn normalize_address(field: &'static str, raw: &str) -> Result<Address> {
    let invalid = || QuoteError::InvalidAddress {
        field,
        value: raw.to_string(),
    };

    let candidate = match raw.len() {
        42 => raw.to_string(),
        66 => format!("0x{}", &raw[raw.len() - 40..]),
        _ => return Err(invalid().into()),
    };
    Address::from_str(&candidate).map_err(|_| invalid().into())
}

/// Parse a base-unit amount. Accepts the service's decimal strings, plain
/// JSON numbers rendered as strings, and `0x`-prefixed hex.
///
/// # Errors
///
/// Returns [`QuoteError::MalformedPayload`] naming `field` when the value
/// does not parse as an unsigned integer.
pub fn parse_base_units(field: &'static str, raw: &str) -> Result<U256> {
    let parsed = if let Some(hex) = raw.strip_prefix("0x") {
        U256::from_str_radix(hex, 16)
    } else {
        U256::from_str_radix(raw, 10)
    };
    parsed.map_err(|_| {
        QuoteError::MalformedPayload {
            reason: format!("{field} is not an unsigned integer: '{raw}'"),
        }
        .into()
    })
}

/// Normalize a 2xx quote response into the canonical [`Quote`].
///
/// # Errors
///
/// Returns [`QuoteError::MalformedPayload`] when no shape adapter matches
/// or amounts do not parse, and [`QuoteError::InvalidAddress`] when address
/// fields cannot be normalized.
pub fn parse_quote(payload: &Value) -> Result<Quote> {
    let (shape, fields) = QUOTE_SHAPES
        .iter()
        .find_map(|(name, adapter)| adapter(payload).map(|fields| (*name, fields)))
        .ok_or_else(|| QuoteError::MalformedPayload {
            reason: "no known payload shape yielded a target address and call data".into(),
        })?;

    let buy_amount = non_empty_str(&payload["buyAmount"]).ok_or_else(|| {
        QuoteError::MalformedPayload {
            reason: "missing buyAmount".into(),
        }
    })?;

    Ok(Quote {
        to: normalize_address("to", &fields.to)?,
        data: Bytes::from_str(&fields.data).map_err(|_| QuoteError::MalformedPayload {
            reason: format!("data is not valid hex: '{}'", fields.data),
        })?,
        value: fields
            .value
            .as_deref()
            .map(|v| parse_base_units("value", v))
            .transpose()?,
        buy_amount: parse_base_units("buyAmount", &buy_amount)?,
        allowance_target: fields
            .allowance_target
            .as_deref()
            .map(|a| normalize_address("allowanceTarget", a))
            .transpose()?,
        shape,
    })
}

/// Normalize a 2xx price response into the canonical [`Price`].
///
/// # Errors
///
/// Returns [`QuoteError::MalformedPayload`] for missing or unparsable
/// fields.
pub fn parse_price(payload: &Value) -> Result<Price> {
    let field = |name: &'static str| {
        non_empty_str(&payload[name]).ok_or_else(|| QuoteError::MalformedPayload {
            reason: format!("missing {name}"),
        })
    };

    Ok(Price {
        price: field("price")?,
        buy_amount: parse_base_units("buyAmount", &field("buyAmount")?)?,
        sell_amount: parse_base_units("sellAmount", &field("sellAmount")?)?,
    })
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    reason: Option<String>,
    message: Option<String>,
    #[serde(default, rename = "validationErrors")]
    validation_errors: Vec<ValidationErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ValidationErrorDetail {
    field: Option<String>,
    reason: Option<String>,
}

/// Flatten a non-success response body into one displayable message:
/// the service-provided reason plus any field-level validation details,
/// or the raw body when it is not JSON.
#[must_use]
pub fn upstream_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<UpstreamErrorBody>(body) else {
        return body.to_string();
    };

    if !parsed.validation_errors.is_empty() {
        let details = parsed
            .validation_errors
            .iter()
            .map(|e| {
                format!(
                    "{} {}",
                    e.field.as_deref().unwrap_or("?"),
                    e.reason.as_deref().unwrap_or("?")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let reason = parsed.reason.as_deref().unwrap_or("ValidationError");
        return format!("{reason}: {details}");
    }

    parsed
        .reason
        .or(parsed.message)
        .unwrap_or_else(|| body.to_string())
}
