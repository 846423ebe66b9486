//! Contract call and deployment commands

use std::path::PathBuf;

use abicodec::abi::decode_hex;
use abicodec::types::BlockId;
use abicodec::{Contract, TxOptions, U256};
use clap::Args;
use tracing::info;

use super::{load_interface, parse_address, parse_values};
use crate::{config::Config, output::Output, CliError};

/// Encode a function call
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Path to the JSON ABI
    #[arg(long)]
    abi: PathBuf,
    /// Function name or full signature
    function: String,
    /// JSON array of arguments
    #[arg(default_value = "[]")]
    args: String,
    /// Contract address; prints the JSON-RPC call instead of raw call data
    #[arg(long)]
    to: Option<String>,
    /// Sender address
    #[arg(long)]
    from: Option<String>,
    /// Gas limit
    #[arg(long)]
    gas: Option<u64>,
    /// Gas price in wei
    #[arg(long)]
    gas_price: Option<u128>,
    /// Value in wei, decimal or `0x` hex
    #[arg(long)]
    value: Option<String>,
    /// Block for constant calls
    #[arg(long, default_value = "latest")]
    block: String,
}

impl CallArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let interface = load_interface(&self.abi, config.codec)?;
        let args = parse_values(&self.args)?;

        let Some(to) = self.to.as_deref() else {
            let data = format!("0x{}", hex::encode(interface.encode_call(&self.function, &args)?));
            Output::new(json).field("data", &data).line(data.clone()).print();
            return Ok(());
        };

        let options = TxOptions {
            from: self.from.as_deref().map(parse_address).transpose()?,
            gas: self.gas,
            gas_price: self.gas_price,
            value: self.value.as_deref().map(parse_wei).transpose()?,
        };
        let block: BlockId = self
            .block
            .parse()
            .map_err(|e| CliError::InvalidInput(format!("block {}: {}", self.block, e)))?;

        let contract = Contract::new(parse_address(to)?, interface);
        let call = contract.rpc_call(&self.function, &args, &options, block)?;
        info!(method = call.method, function = %self.function, "Built RPC call");

        let params = serde_json::to_value(&call.params)?;
        Output::new(json)
            .field("method", call.method)
            .field_value("params", params.clone())
            .line(call.method)
            .line(serde_json::to_string_pretty(&params)?)
            .print();
        Ok(())
    }
}

/// Build deployment data: bytecode followed by constructor arguments
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Path to the JSON ABI
    #[arg(long)]
    abi: PathBuf,
    /// Contract bytecode as hex
    #[arg(long)]
    bytecode: String,
    /// JSON array of constructor arguments
    #[arg(default_value = "[]")]
    args: String,
}

impl DeployArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let interface = load_interface(&self.abi, config.codec)?;
        let bytecode = decode_hex(&self.bytecode)?;
        let data = interface.encode_constructor(&bytecode, &parse_values(&self.args)?)?;

        let data = format!("0x{}", hex::encode(data));
        Output::new(json).field("data", &data).line(data.clone()).print();
        Ok(())
    }
}

fn parse_wei(s: &str) -> Result<U256, CliError> {
    let parsed = match s.strip_prefix("0x") {
        Some(digits) => U256::from_str_radix(digits, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(s).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| CliError::InvalidInput(format!("value {}: {}", s, e)))
}
