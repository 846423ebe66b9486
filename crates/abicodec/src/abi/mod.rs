//! ABI encoding and decoding for Solidity contracts
//!
//! This module provides functionality for:
//! - Parsing type strings into [`ParamType`]
//! - Encoding and decoding single words and whole parameter blocks
//! - Converting loosely typed JSON values into [`Token`]s
//! - Computing signatures, function selectors and event topics
//!
//! # Example
//!
//! ```rust
//! use abicodec::abi::{decode, encode_params, function_selector, parse_type, Token};
//! use abicodec_primitives::{Address, U256};
//!
//! // Encode a transfer call
//! let types = [parse_type("address").unwrap(), parse_type("uint256").unwrap()];
//! let selector = function_selector("transfer(address,uint256)");
//! assert_eq!(selector, [0xa9, 0x05, 0x9c, 0xbb]);
//! let args = encode_params(&types, &[Token::Address(Address::ZERO), Token::Uint(U256::from(1000))]).unwrap();
//! assert_eq!(args.len(), 64);
//!
//! // Decode a balance response
//! let return_data = [0u8; 32];
//! let balance = decode(&[parse_type("uint256").unwrap()], &return_data).unwrap();
//! assert_eq!(balance, vec![Token::Uint(U256::zero())]);
//! ```

mod coerce;
mod decode;
mod encode;
mod fixed;
mod signature;
mod types;
mod word;

pub use coerce::{parse_decimal, parse_number, tokenize, tokenize_all, Decimal};
pub use decode::{
    decode, decode_hex, decode_output, decode_param, decode_parameters, decode_parameters_with,
    decode_with,
};
pub use encode::{
    encode, encode_function_call, encode_parameters, encode_parameters_with, encode_params,
    encode_params_with,
};
pub use fixed::{format_fixed, format_ufixed, scale, FRACTION_BITS};
pub use signature::{display_name, event_topic, function_selector, selector_hex, signature};
pub use types::{parse_type, I256, ParamType, Token};
pub use word::{decode_word, encode_word, encode_word_hex, pad_right, words_for};
