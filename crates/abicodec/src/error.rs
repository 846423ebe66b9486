//! Codec error types

use thiserror::Error;

/// ABI codec error type
#[derive(Debug, Error)]
pub enum AbiError {
    /// Type string names no supported ABI type
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Value is incompatible with its declared type
    #[error("ABI encoding error: {0}")]
    Encoding(String),

    /// Malformed or truncated encoded data
    #[error("ABI decoding error: {0}")]
    Decoding(String),

    /// No function matches the requested name and arguments (strict mode only)
    #[error("No overload of '{name}' accepts {args} argument(s)")]
    OverloadResolution {
        /// Requested function name or signature
        name: String,
        /// Number of supplied arguments
        args: usize,
    },

    /// No event with this name or topic
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Malformed ABI description or value JSON
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<hex::FromHexError> for AbiError {
    fn from(e: hex::FromHexError) -> Self {
        AbiError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::Json(e.to_string())
    }
}
