//! Event log commands

use std::path::PathBuf;

use abicodec::types::BlockId;
use abicodec::{FilterOptions, RawLog};
use clap::Args;
use serde_json::Value;

use super::{load_interface, parse_address};
use crate::{config::Config, output::Output, CliError};

/// Build a log filter for an event
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Path to the JSON ABI
    #[arg(long)]
    abi: PathBuf,
    /// Event name or full signature
    event: String,
    /// JSON object of indexed argument values; arrays match any element
    #[arg(default_value = "{}")]
    args: String,
    /// Contract address
    #[arg(long)]
    address: Option<String>,
    /// First block
    #[arg(long)]
    from_block: Option<String>,
    /// Last block
    #[arg(long)]
    to_block: Option<String>,
}

impl FilterArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let interface = load_interface(&self.abi, config.codec)?;
        let args: Value = serde_json::from_str(&self.args)?;

        let options = FilterOptions {
            address: self.address.as_deref().map(parse_address).transpose()?,
            from_block: self.from_block.as_deref().map(parse_block).transpose()?,
            to_block: self.to_block.as_deref().map(parse_block).transpose()?,
        };
        let filter = interface.event(&self.event)?.encode_filter(&args, &options)?;

        let filter = serde_json::to_value(&filter)?;
        Output::new(json)
            .field_value("filter", filter.clone())
            .line(serde_json::to_string_pretty(&filter)?)
            .print();
        Ok(())
    }
}

/// Decode a log against the events of an ABI
#[derive(Debug, Args)]
pub struct DecodeLogArgs {
    /// Path to the JSON ABI
    #[arg(long)]
    abi: PathBuf,
    /// Log object as JSON, as returned by `eth_getLogs`
    log: String,
}

impl DecodeLogArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let interface = load_interface(&self.abi, config.codec)?;
        let log: RawLog = serde_json::from_str(&self.log)?;
        let decoded = interface.decode_log(&log)?;

        let mut output = Output::new(json)
            .field_value("log", serde_json::to_value(&decoded)?)
            .line(decoded.event.clone());
        for (name, token) in &decoded.args {
            output = output.line(format!("  {}: {}", name, token.to_json()));
        }
        output.print();
        Ok(())
    }
}

fn parse_block(s: &str) -> Result<BlockId, CliError> {
    s.parse()
        .map_err(|e| CliError::InvalidInput(format!("block {}: {}", s, e)))
}
