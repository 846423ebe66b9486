//! CLI subcommands

pub mod codec;
pub mod contract;
pub mod event;

use std::path::Path;

use abicodec::{Address, CodecOptions, Interface, Layout};
use serde_json::Value;
use tracing::debug;

use crate::CliError;

/// Load a JSON ABI file and apply the codec options
fn load_interface(path: &Path, options: CodecOptions) -> Result<Interface, CliError> {
    let json = std::fs::read_to_string(path)?;
    let interface = Interface::from_json(&json)?.with_options(options);
    debug!(
        path = %path.display(),
        functions = interface.functions().len(),
        events = interface.events().len(),
        "Loaded interface"
    );
    Ok(interface)
}

/// Parse a JSON array of argument values
fn parse_values(json: &str) -> Result<Vec<Value>, CliError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(values) => Ok(values),
        other => Err(CliError::InvalidInput(format!(
            "expected a JSON array of values, got {}",
            other
        ))),
    }
}

fn parse_address(s: &str) -> Result<Address, CliError> {
    Address::from_hex(s).map_err(|e| CliError::InvalidAddress(format!("{}: {}", s, e)))
}

/// `--legacy` forces the legacy layout over the configured one
fn layout(options: CodecOptions, legacy: bool) -> Layout {
    if legacy {
        Layout::Legacy
    } else {
        options.layout
    }
}
