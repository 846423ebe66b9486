//! Event filters and log decoding
//!
//! Indexed inputs travel in log topics, everything else in the data block.
//! A non-anonymous event spends `topics[0]` on the hash of its signature.
//! Indexed inputs of dynamic type are stored as the keccak256 hash of their
//! contents, so decoding yields that hash rather than the original value.

use abicodec_crypto::{keccak256, keccak256_concat};
use abicodec_primitives::{Address, H256};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::abi::{
    decode_with, decode_word, encode_word, event_topic, display_name, signature, tokenize,
    ParamType, Token,
};
use crate::interface::{name_tokens, parse_params, types_of, AbiEntry, Param};
use crate::serde_helpers::{hex_bytes, opt_quantity};
use crate::types::BlockId;
use crate::{AbiError, Layout};

/// A log event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Display name
    pub name: String,
    /// Canonical signature
    pub signature: String,
    /// Inputs in declaration order
    pub inputs: Vec<Param>,
    /// No signature topic
    pub anonymous: bool,
    topic: H256,
    layout: Layout,
}

/// Optional filter fields besides the topics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Emitting contract
    pub address: Option<Address>,
    /// First block to search
    pub from_block: Option<BlockId>,
    /// Last block to search
    pub to_block: Option<BlockId>,
}

/// One topic position of a log filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TopicFilter {
    /// Matches anything (`null`)
    Any,
    /// Matches exactly this topic
    Single(H256),
    /// Matches any of these topics
    AnyOf(Vec<H256>),
}

/// Log filter for `eth_newFilter` / `eth_getLogs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// Emitting contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Topic positions
    pub topics: Vec<TopicFilter>,
    /// First block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockId>,
    /// Last block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockId>,
}

/// Log as returned by the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    /// Emitting contract
    #[serde(default)]
    pub address: Option<Address>,
    /// Topics
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Non-indexed data
    #[serde(default, deserialize_with = "hex_bytes")]
    pub data: Vec<u8>,
    /// Block number
    #[serde(default, deserialize_with = "opt_quantity")]
    pub block_number: Option<u64>,
    /// Block hash
    #[serde(default)]
    pub block_hash: Option<H256>,
    /// Transaction hash
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    /// Transaction index in the block
    #[serde(default, deserialize_with = "opt_quantity")]
    pub transaction_index: Option<u64>,
    /// Log index in the block
    #[serde(default, deserialize_with = "opt_quantity")]
    pub log_index: Option<u64>,
}

/// Decoded log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEvent {
    /// Event display name
    pub event: String,
    /// Arguments by name, in declaration order
    pub args: IndexMap<String, Token>,
    /// Emitting contract
    pub address: Option<Address>,
    /// Block number
    pub block_number: Option<u64>,
    /// Block hash
    pub block_hash: Option<H256>,
    /// Transaction hash
    pub transaction_hash: Option<H256>,
    /// Transaction index
    pub transaction_index: Option<u64>,
    /// Log index
    pub log_index: Option<u64>,
}

impl Event {
    /// Create an event with the standard layout
    pub fn new(name: &str, inputs: Vec<Param>, anonymous: bool) -> Self {
        let signature = signature(name, &types_of(&inputs));
        let topic = event_topic(&signature);
        Self {
            name: display_name(name).to_string(),
            signature,
            inputs,
            anonymous,
            topic,
            layout: Layout::Standard,
        }
    }

    pub(crate) fn from_entry(entry: &AbiEntry) -> Result<Self, AbiError> {
        Ok(Self::new(
            &entry.name,
            parse_params(&entry.inputs)?,
            entry.anonymous,
        ))
    }

    pub(crate) fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Hash of the signature
    pub fn topic(&self) -> H256 {
        self.topic
    }

    /// Indexed inputs in declaration order
    pub fn indexed_inputs(&self) -> impl Iterator<Item = &Param> {
        self.inputs.iter().filter(|p| p.indexed)
    }

    /// Non-indexed inputs in declaration order
    pub fn data_inputs(&self) -> impl Iterator<Item = &Param> {
        self.inputs.iter().filter(|p| !p.indexed)
    }

    /// Build a log filter
    ///
    /// `args` is a JSON object keyed by indexed input name (or `null`).
    /// A missing or `null` entry matches anything; an array of values
    /// matches any of them.
    pub fn encode_filter(&self, args: &Value, options: &FilterOptions) -> Result<LogFilter, AbiError> {
        let args = match args {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                return Err(AbiError::Encoding(format!(
                    "event filter arguments must be an object, got {}",
                    other
                )))
            }
        };

        let mut topics = Vec::new();
        if !self.anonymous {
            topics.push(TopicFilter::Single(self.topic));
        }
        for input in self.indexed_inputs() {
            let value = args.and_then(|map| map.get(&input.name));
            topics.push(match value {
                None | Some(Value::Null) => TopicFilter::Any,
                Some(value) => topic_filter(&input.kind, value)?,
            });
        }
        debug!(event = %self.signature, topics = topics.len(), "Built log filter");

        Ok(LogFilter {
            address: options.address,
            topics,
            from_block: options.from_block,
            to_block: options.to_block,
        })
    }

    /// Decode a log emitted by this event
    pub fn decode_log(&self, log: &RawLog) -> Result<DecodedEvent, AbiError> {
        let mut topics = log.topics.iter();
        if !self.anonymous {
            match topics.next() {
                Some(topic) if *topic == self.topic => {}
                Some(topic) => {
                    return Err(AbiError::Decoding(format!(
                        "topic {} does not match {}",
                        topic, self.signature
                    )))
                }
                None => return Err(AbiError::Decoding("log has no topics".to_string())),
            }
        }

        let mut indexed = Vec::new();
        for input in self.indexed_inputs() {
            let topic = topics.next().ok_or_else(|| {
                AbiError::Decoding(format!("missing topic for indexed input {}", input.name))
            })?;
            indexed.push(decode_topic(&input.kind, topic)?);
        }

        let data_types: Vec<ParamType> = self.data_inputs().map(|p| p.kind.clone()).collect();
        let data = decode_with(self.layout, &data_types, &log.data)?;

        // Merge back into declaration order
        let mut indexed = indexed.into_iter();
        let mut data = data.into_iter();
        let mut tokens = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let next = if input.indexed { indexed.next() } else { data.next() };
            tokens.push(next.ok_or_else(|| AbiError::Decoding("missing event argument".to_string()))?);
        }

        Ok(DecodedEvent {
            event: self.name.clone(),
            args: name_tokens(&self.inputs, tokens),
            address: log.address,
            block_number: log.block_number,
            block_hash: log.block_hash,
            transaction_hash: log.transaction_hash,
            transaction_index: log.transaction_index,
            log_index: log.log_index,
        })
    }
}

fn topic_filter(param_type: &ParamType, value: &Value) -> Result<TopicFilter, AbiError> {
    let candidates = match (param_type, value) {
        // For array inputs only an array of arrays is a candidate list
        (ParamType::Array(_), Value::Array(items)) if items.iter().all(Value::is_array) && !items.is_empty() => {
            Some(items)
        }
        (ParamType::Array(_), _) => None,
        (_, Value::Array(items)) => Some(items),
        _ => None,
    };

    match candidates {
        Some(items) => items
            .iter()
            .map(|item| encode_topic(param_type, item))
            .collect::<Result<Vec<_>, _>>()
            .map(TopicFilter::AnyOf),
        None => encode_topic(param_type, value).map(TopicFilter::Single),
    }
}

/// Topic word of one indexed value
pub fn encode_topic(param_type: &ParamType, value: &Value) -> Result<H256, AbiError> {
    let token = tokenize(param_type, value)?;
    match (param_type, &token) {
        (ParamType::Bytes, Token::Bytes(data)) => Ok(keccak256(data)),
        (ParamType::String, Token::String(s)) => Ok(keccak256(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(items)) => {
            let words = items
                .iter()
                .map(|item| encode_word(inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(keccak256_concat(words.iter().map(|w| w.as_slice())))
        }
        _ => encode_word(param_type, &token).map(H256::from_bytes),
    }
}

fn decode_topic(param_type: &ParamType, topic: &H256) -> Result<Token, AbiError> {
    if param_type.is_dynamic() {
        return Ok(Token::FixedBytes(topic.as_bytes().to_vec()));
    }
    decode_word(param_type, topic.as_bytes())
}
