//! JSON-RPC request types built from encoded call data

use abicodec_primitives::{u256_to_word, Address, U256};
use bytes::Bytes;
use serde::Serialize;

/// Block identifier for RPC queries and log filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&format!("0x{:x}", n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
        }
    }
}

impl std::str::FromStr for BlockId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockId::Latest),
            "pending" => Ok(BlockId::Pending),
            "earliest" => Ok(BlockId::Earliest),
            other => match other.strip_prefix("0x") {
                Some(digits) => u64::from_str_radix(digits, 16).map(BlockId::Number),
                None => other.parse().map(BlockId::Number),
            },
        }
    }
}

/// Call request for eth_call and eth_sendTransaction
#[derive(Debug, Clone, Default)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address, `None` for contract creation
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<u128>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Input data
    pub data: Option<Bytes>,
}

impl CallRequest {
    /// Call `to` with `data`
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            to: Some(to),
            data: Some(data),
            ..Default::default()
        }
    }
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let count = [
            self.from.is_some(),
            self.to.is_some(),
            self.gas.is_some(),
            self.gas_price.is_some(),
            self.value.is_some(),
            self.data.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let mut map = serializer.serialize_map(Some(count))?;

        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format!("0x{:x}", gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &format!("0x{:x}", gas_price))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &quantity_hex(value))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }

        map.end()
    }
}

/// Minimal `0x` hex of a quantity, `0x0` for zero
pub fn quantity_hex(value: &U256) -> String {
    let digits = hex::encode(u256_to_word(value));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_serialize() {
        assert_eq!(serde_json::to_string(&BlockId::Latest).unwrap(), "\"latest\"");
        assert_eq!(serde_json::to_string(&BlockId::Number(100)).unwrap(), "\"0x64\"");
        assert_eq!(serde_json::to_string(&BlockId::Pending).unwrap(), "\"pending\"");
    }

    #[test]
    fn test_block_id_parse() {
        assert_eq!("latest".parse::<BlockId>().unwrap(), BlockId::Latest);
        assert_eq!("100".parse::<BlockId>().unwrap(), BlockId::Number(100));
        assert_eq!("0x64".parse::<BlockId>().unwrap(), BlockId::Number(100));
        assert!("soon".parse::<BlockId>().is_err());
    }

    #[test]
    fn test_call_request_serialize() {
        let req = CallRequest::new(Address::ZERO, Bytes::from(vec![0x01, 0x02]));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to"], format!("0x{}", "0".repeat(40)));
        assert_eq!(json["data"], "0x0102");
        assert!(json.get("from").is_none());
    }

    #[test]
    fn test_call_request_serialize_with_value() {
        let req = CallRequest {
            value: Some(U256::from(1000)),
            gas: Some(21000),
            ..CallRequest::new(Address::ZERO, Bytes::new())
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["value"], "0x3e8");
        assert_eq!(json["gas"], "0x5208");
    }

    #[test]
    fn test_quantity_hex_zero() {
        assert_eq!(quantity_hex(&U256::zero()), "0x0");
    }
}
