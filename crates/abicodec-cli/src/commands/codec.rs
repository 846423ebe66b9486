//! Raw parameter block commands

use abicodec::abi::{self, Token};
use clap::Args;
use serde_json::Value;

use super::{layout, parse_values};
use crate::{config::Config, output::Output, CliError};

/// Encode values as a parameter block
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Comma separated parameter types, e.g. `uint256,string`
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,
    /// JSON array of values
    values: String,
    /// Use the legacy layout
    #[arg(long)]
    legacy: bool,
}

impl EncodeArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let types: Vec<&str> = self.types.iter().map(String::as_str).collect();
        let values = parse_values(&self.values)?;
        let layout = layout(config.codec, self.legacy);

        let encoded = abi::encode_parameters_with(layout, &types, &values)?;
        let encoded = format!("0x{}", encoded);

        Output::new(json)
            .field("layout", &layout.to_string())
            .field("data", &encoded)
            .line(encoded.clone())
            .print();
        Ok(())
    }
}

/// Decode a parameter block
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Comma separated parameter types
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,
    /// Hex data, with or without `0x`
    data: String,
    /// Use the legacy layout
    #[arg(long)]
    legacy: bool,
}

impl DecodeArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let types: Vec<&str> = self.types.iter().map(String::as_str).collect();
        let tokens = abi::decode_parameters_with(layout(config.codec, self.legacy), &types, &self.data)?;

        let values: Vec<Value> = tokens.iter().map(Token::to_json).collect();
        let mut output = Output::new(json).field_value("values", Value::Array(values.clone()));
        for (ty, value) in types.iter().zip(&values) {
            output = output.line(format!("{}: {}", ty, value));
        }
        output.print();
        Ok(())
    }
}

/// Selector and event topic of a signature
#[derive(Debug, Args)]
pub struct SelectorArgs {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    signature: String,
}

impl SelectorArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        if !self.signature.contains('(') || !self.signature.ends_with(')') {
            return Err(CliError::InvalidInput(format!(
                "not a signature: {}",
                self.signature
            )));
        }

        let selector = abi::selector_hex(&self.signature);
        let topic = abi::event_topic(&self.signature).to_hex();

        Output::new(json)
            .field("signature", &self.signature)
            .field("selector", &selector)
            .field("topic", &topic)
            .line(format!("Selector: {}", selector))
            .line(format!("Topic:    {}", topic))
            .print();
        Ok(())
    }
}
