//! Configuration file loading tests.

use std::io::Write;

use kiosko::config::Config;
use kiosko::error::{ConfigError, Error};

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("kiosko-config-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn full_config_round_trips() {
    let file = write_temp_config(
        r#"
[quote]
url = "https://proxy.example.com/quote"
slippage_bps = 50
timeout_ms = 1000

[network]
rpc_url = "https://testnet-rpc.monad.xyz"
chain_id = 10143

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.quote.url, "https://proxy.example.com/quote");
    assert_eq!(config.quote.slippage_bps, 50);
    assert_eq!(config.quote.timeout_ms, 1000);
    // Unspecified fields keep their defaults.
    assert_eq!(config.quote.connect_timeout_ms, 2000);
    assert_eq!(config.network.chain_id, 10143);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn partial_config_fills_in_defaults() {
    let file = write_temp_config(
        r#"
[quote]
url = "https://proxy.example.com/quote"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.quote.slippage_bps, 100);
    assert_eq!(config.network.chain_id, 10143);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_temp_config("this is not toml [");

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::Parse(_))) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_a_read_error() {
    match Config::load("/nonexistent/kiosko.toml") {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn invalid_slippage_is_rejected() {
    let file = write_temp_config(
        r#"
[quote]
slippage_bps = 10001
"#,
    );

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "quote.slippage_bps",
            ..
        })) => {}
        other => panic!("expected invalid slippage to be rejected, got {other:?}"),
    }
}

#[test]
fn load_or_default_accepts_a_missing_file() {
    let config = Config::load_or_default("/nonexistent/kiosko.toml").unwrap();
    assert_eq!(config.network.chain_id, 10143);
}
