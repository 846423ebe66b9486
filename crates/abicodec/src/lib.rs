//! # abicodec
//!
//! Solidity ABI codec for contract calls, return values and event logs.
//!
//! ## Features
//!
//! - **abi**: type parsing, word codec, parameter encoding/decoding, selectors
//! - **Interface**: overload table built from a JSON ABI
//! - **Event**: log filters and log decoding
//! - **Contract**: call requests and deployment data bound to an address
//!
//! ## Quick Start
//!
//! ```rust
//! use abicodec::{abi, Interface};
//! use serde_json::json;
//!
//! let abi_json = r#"[{"name":"transfer","type":"function",
//!     "inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],
//!     "outputs":[{"name":"","type":"bool"}]}]"#;
//!
//! let iface = Interface::from_json(abi_json)?;
//! let data = iface.encode_call(
//!     "transfer",
//!     &[json!("0x1234567890123456789012345678901234567890"), json!(1000)],
//! )?;
//! assert_eq!(&data[..4], &abi::function_selector("transfer(address,uint256)"));
//!
//! let words = abi::encode_parameters(&["int"], &[json!(-1)])?;
//! assert_eq!(words, "f".repeat(64));
//! # Ok::<(), abicodec::AbiError>(())
//! ```
//!
//! ## Event Logs
//!
//! ```rust
//! use abicodec::{FilterOptions, Interface};
//! use serde_json::json;
//!
//! let iface = Interface::from_json(r#"[{"name":"Changed","type":"event","inputs":[
//!     {"name":"from","type":"address","indexed":true},
//!     {"name":"amount","type":"uint256","indexed":true},
//!     {"name":"t1","type":"uint256","indexed":false}]}]"#)?;
//!
//! let filter = iface
//!     .event("Changed")?
//!     .encode_filter(&json!({"from": "0x1234567890123456789012345678901234567890"}), &FilterOptions::default())?;
//! assert_eq!(filter.topics.len(), 3);
//! # Ok::<(), abicodec::AbiError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod contract;
mod error;
pub mod event;
pub mod interface;
mod options;
mod serde_helpers;
pub mod types;

// Re-export main types
pub use contract::{Contract, RpcCall, TxOptions};
pub use error::AbiError;
pub use event::{DecodedEvent, Event, FilterOptions, LogFilter, RawLog, TopicFilter};
pub use interface::{AbiEntry, AbiParam, EntryKind, Function, Interface, Param};
pub use options::{CodecOptions, Layout};

// Re-export primitives for convenience
pub use abicodec_primitives::{Address, H256, U256};
