//! ABI type definitions and the type-string parser

use std::fmt;
use std::str::FromStr;

use abicodec_primitives::{Address, H256, U256};
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::fixed::{format_fixed, format_ufixed};
use crate::AbiError;

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Signed 128x128 fixed point, stored as the raw value scaled by 2^128
    Fixed(I256),
    /// Unsigned 128x128 fixed point, stored as the raw value scaled by 2^128
    UFixed(U256),
    /// Dynamic array
    Array(Vec<Token>),
}

/// Signed 256-bit integer
///
/// Kept as sign and magnitude; the word codec converts to and from
/// 256-bit two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256. Negative zero is normalized to zero.
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Interpret a 256-bit pattern as two's complement
    pub fn from_twos_complement(raw: U256) -> Self {
        if raw.bit(255) {
            let abs = (!raw).overflowing_add(U256::one()).0;
            Self::new(abs, true)
        } else {
            Self::new(raw, false)
        }
    }

    /// 256-bit two's complement pattern of this value
    pub fn to_twos_complement(&self) -> U256 {
        if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

/// Solidity parameter types
///
/// Only a single level of dynamic array (`T[]`) over a static element is
/// representable; [`parse_type`] rejects everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Signed fixed point, 128 integer bits and 128 fractional bits
    Fixed,
    /// Unsigned fixed point, 128 integer bits and 128 fractional bits
    UFixed,
    /// Dynamic array of a static element type
    Array(Box<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String | ParamType::Array(_))
    }

    /// Number of `[]` suffixes (0 or 1)
    pub fn array_depth(&self) -> usize {
        match self {
            ParamType::Array(_) => 1,
            _ => 0,
        }
    }

    /// Element type for arrays, the type itself otherwise
    pub fn base(&self) -> &ParamType {
        match self {
            ParamType::Array(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => write!(f, "string"),
            ParamType::Fixed => write!(f, "fixed128x128"),
            ParamType::UFixed => write!(f, "ufixed128x128"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}

impl Token {
    /// Create an address token
    pub fn address(addr: Address) -> Self {
        Token::Address(addr)
    }

    /// Create a uint256 token
    pub fn uint256(value: U256) -> Self {
        Token::Uint(value)
    }

    /// Create a uint256 from u128
    pub fn uint256_from_u128(value: u128) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an int256 token from i128
    pub fn int256_from_i128(value: i128) -> Self {
        Token::Int(I256::from_i128(value))
    }

    /// Create a bool token
    pub fn bool(value: bool) -> Self {
        Token::Bool(value)
    }

    /// Create a bytes token
    pub fn bytes(data: Vec<u8>) -> Self {
        Token::Bytes(data)
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Get the type of this token
    ///
    /// Integers report their 256-bit form; an empty array reports `uint256[]`.
    pub fn type_of(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint(_) => ParamType::Uint(256),
            Token::Int(_) => ParamType::Int(256),
            Token::Bool(_) => ParamType::Bool,
            Token::Bytes(_) => ParamType::Bytes,
            Token::FixedBytes(b) => ParamType::FixedBytes(b.len()),
            Token::String(_) => ParamType::String,
            Token::Fixed(_) => ParamType::Fixed,
            Token::UFixed(_) => ParamType::UFixed,
            Token::Array(tokens) => {
                let inner = tokens.first().map(|t| t.type_of()).unwrap_or(ParamType::Uint(256));
                ParamType::Array(Box::new(inner))
            }
        }
    }

    /// Short variant name used in error messages
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Fixed(_) => "fixed",
            Token::UFixed(_) => "ufixed",
            Token::Array(_) => "array",
        }
    }

    /// Normalized JSON form: integers and fixed point as decimal strings,
    /// bytes and addresses as `0x` hex
    pub fn to_json(&self) -> Value {
        match self {
            Token::Address(addr) => Value::String(addr.to_hex()),
            Token::Uint(value) => Value::String(value.to_string()),
            Token::Int(value) => Value::String(value.to_string()),
            Token::Bool(b) => Value::Bool(*b),
            Token::Bytes(data) | Token::FixedBytes(data) => {
                Value::String(format!("0x{}", hex::encode(data)))
            }
            Token::String(s) => Value::String(s.clone()),
            Token::Fixed(raw) => Value::String(format_fixed(raw)),
            Token::UFixed(raw) => Value::String(format_ufixed(raw)),
            Token::Array(tokens) => Value::Array(tokens.iter().map(Token::to_json).collect()),
        }
    }

    /// Unsigned value, if this is a `Uint`
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Signed value, if this is an `Int`
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Token::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Address value, if this is an `Address`
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(*a),
            _ => None,
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Parse an ABI type string (e.g., "uint256", "int[]", "bytes32")
pub fn parse_type(s: &str) -> Result<ParamType, AbiError> {
    let s = s.trim();

    if let Some(inner) = s.strip_suffix("[]") {
        let inner = parse_type(inner)?;
        if inner.is_dynamic() {
            return Err(AbiError::InvalidType(format!(
                "{}: arrays of dynamic elements and nested arrays are not supported",
                s
            )));
        }
        return Ok(ParamType::Array(Box::new(inner)));
    }
    if s.ends_with(']') {
        return Err(AbiError::InvalidType(format!(
            "{}: fixed-size arrays are not supported",
            s
        )));
    }

    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "real" | "fixed" | "fixed128x128" => return Ok(ParamType::Fixed),
        "ureal" | "ufixed" | "ufixed128x128" => return Ok(ParamType::UFixed),
        _ => {}
    }

    // uint<N>
    if let Some(rest) = s.strip_prefix("uint") {
        return Ok(ParamType::Uint(parse_bits(s, rest)?));
    }

    // int<N>
    if let Some(rest) = s.strip_prefix("int") {
        return Ok(ParamType::Int(parse_bits(s, rest)?));
    }

    // bytes<N>
    if let Some(rest) = s.strip_prefix("bytes") {
        let size = parse_digits(rest)
            .filter(|n| (1..=32).contains(n))
            .ok_or_else(|| AbiError::InvalidType(format!("{}: invalid bytes size", s)))?;
        return Ok(ParamType::FixedBytes(size));
    }

    Err(AbiError::InvalidType(format!("Unknown type: {}", s)))
}

/// Bit width of `int`/`uint`; 256 when omitted
fn parse_bits(full: &str, rest: &str) -> Result<usize, AbiError> {
    if rest.is_empty() {
        return Ok(256);
    }
    parse_digits(rest)
        .filter(|bits| *bits >= 8 && *bits <= 256 && bits % 8 == 0)
        .ok_or_else(|| AbiError::InvalidType(format!("{}: invalid integer size", full)))
}

fn parse_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
