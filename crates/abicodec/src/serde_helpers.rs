//! Serde helpers for JSON-RPC style fields

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Optional quantity given as `"0x1b"`, `"27"` or `27`; `null` or absent is `None`
pub fn opt_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_quantity(&v).map(Some).map_err(D::Error::custom),
    }
}

/// `0x` hex byte string
pub fn hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    let digits = s.strip_prefix("0x").unwrap_or(&s);
    hex::decode(digits).map_err(D::Error::custom)
}

fn parse_quantity(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("invalid quantity: {}", n)),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(digits) => u64::from_str_radix(digits, 16)
                .map_err(|e| format!("invalid hex quantity {:?}: {}", s, e)),
            None => s
                .parse()
                .map_err(|e| format!("invalid quantity {:?}: {}", s, e)),
        },
        other => Err(format!("invalid quantity: {}", other)),
    }
}
