//! Contract interaction helpers

use abicodec_primitives::{Address, U256};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::abi::{ParamType, Token};
use crate::event::{DecodedEvent, FilterOptions, LogFilter, RawLog};
use crate::interface::{Function, Interface, Param};
use crate::types::{BlockId, CallRequest};
use crate::{AbiError, Event};

/// Optional transaction fields attached to a call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Sender
    pub from: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<u128>,
    /// Value to transfer
    pub value: Option<U256>,
}

/// A JSON-RPC method with its positional params
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcCall {
    /// `eth_call` or `eth_sendTransaction`
    pub method: &'static str,
    /// Positional parameters
    pub params: Vec<Value>,
}

/// A deployed contract: an address plus its interface
#[derive(Debug, Clone)]
pub struct Contract {
    address: Address,
    interface: Interface,
}

impl Contract {
    /// Bind an interface to an address
    pub fn new(address: Address, interface: Interface) -> Self {
        Self { address, interface }
    }

    /// Parse a JSON ABI and bind it to an address
    pub fn from_json(address: Address, abi: &str) -> Result<Self, AbiError> {
        Ok(Self::new(address, Interface::from_json(abi)?))
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the interface
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Encoded call data for `name` (display name or full signature)
    pub fn encode_call(&self, name: &str, args: &[Value]) -> Result<Bytes, AbiError> {
        self.interface.encode_call(name, args)
    }

    /// Request object for `eth_call` / `eth_sendTransaction`
    pub fn call_request(
        &self,
        name: &str,
        args: &[Value],
        options: &TxOptions,
    ) -> Result<CallRequest, AbiError> {
        let data = self.encode_call(name, args)?;
        Ok(CallRequest {
            from: options.from,
            gas: options.gas,
            gas_price: options.gas_price,
            value: options.value,
            ..CallRequest::new(self.address, data)
        })
    }

    /// JSON-RPC method and params for a call
    ///
    /// Constant functions go through `eth_call` against `block`; everything
    /// else through `eth_sendTransaction`.
    pub fn rpc_call(
        &self,
        name: &str,
        args: &[Value],
        options: &TxOptions,
        block: BlockId,
    ) -> Result<RpcCall, AbiError> {
        let constant = self
            .interface
            .lookup(name, args.len())
            .is_some_and(|f| f.constant);
        let request = serde_json::to_value(self.call_request(name, args, options)?)?;

        Ok(if constant {
            RpcCall {
                method: "eth_call",
                params: vec![request, serde_json::to_value(block)?],
            }
        } else {
            RpcCall {
                method: "eth_sendTransaction",
                params: vec![request],
            }
        })
    }

    /// Deployment data: bytecode followed by the constructor arguments
    pub fn deploy_data(&self, bytecode: &[u8], args: &[Value]) -> Result<Bytes, AbiError> {
        self.interface.encode_constructor(bytecode, args)
    }

    /// Decode function output
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        self.interface.decode_output(name, data)
    }

    /// Log filter for one of this contract's events
    pub fn event_filter(
        &self,
        event: &str,
        args: &Value,
        options: &FilterOptions,
    ) -> Result<LogFilter, AbiError> {
        let options = FilterOptions {
            address: Some(self.address),
            ..options.clone()
        };
        self.interface.event(event)?.encode_filter(args, &options)
    }

    /// Decode a log emitted by this contract
    pub fn decode_log(&self, log: &RawLog) -> Result<DecodedEvent, AbiError> {
        self.interface.decode_log(log)
    }
}

/// Create an ERC20 contract helper
pub fn erc20(address: Address) -> Contract {
    let owner = || Param::new("owner", ParamType::Address);
    let spender = || Param::new("spender", ParamType::Address);
    let amount = || Param::new("value", ParamType::Uint(256));
    let success = || vec![Param::new("", ParamType::Bool)];

    let interface = Interface::default()
        .with_function(Function::new("name", vec![], vec![Param::new("", ParamType::String)], true))
        .with_function(Function::new("symbol", vec![], vec![Param::new("", ParamType::String)], true))
        .with_function(Function::new("decimals", vec![], vec![Param::new("", ParamType::Uint(8))], true))
        .with_function(Function::new("totalSupply", vec![], vec![amount()], true))
        .with_function(Function::new("balanceOf", vec![owner()], vec![amount()], true))
        .with_function(Function::new(
            "transfer",
            vec![Param::new("to", ParamType::Address), amount()],
            success(),
            false,
        ))
        .with_function(Function::new("approve", vec![spender(), amount()], success(), false))
        .with_function(Function::new("allowance", vec![owner(), spender()], vec![amount()], true))
        .with_function(Function::new(
            "transferFrom",
            vec![
                Param::new("from", ParamType::Address),
                Param::new("to", ParamType::Address),
                amount(),
            ],
            success(),
            false,
        ))
        .with_event(Event::new(
            "Transfer",
            vec![
                Param::new("from", ParamType::Address).indexed(),
                Param::new("to", ParamType::Address).indexed(),
                amount(),
            ],
            false,
        ))
        .with_event(Event::new(
            "Approval",
            vec![owner().indexed(), spender().indexed(), amount()],
            false,
        ));

    Contract::new(address, interface)
}
