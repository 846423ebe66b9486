//! Canonical signatures, selectors and event topics

use abicodec_crypto::keccak256;
use abicodec_primitives::H256;

use super::types::ParamType;

/// Canonical signature `name(t1,t2,...)`
///
/// A `name` that already carries a parameter list (legacy ABIs name
/// entries `"balance(address)"`) is returned unchanged.
pub fn signature(name: &str, types: &[ParamType]) -> String {
    if name.contains('(') {
        return name.to_string();
    }
    let params: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("{}({})", name, params.join(","))
}

/// Name without any parameter list
pub fn display_name(name: &str) -> &str {
    match name.find('(') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Selector as `0x` followed by 8 hex characters
pub fn selector_hex(signature: &str) -> String {
    format!("0x{}", hex::encode(function_selector(signature)))
}

/// Full 32-byte event topic of a signature
pub fn event_topic(signature: &str) -> H256 {
    keccak256(signature.as_bytes())
}
