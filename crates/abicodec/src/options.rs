//! Codec options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AbiError;

/// Parameter block layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Head of values and offsets, followed by the dynamic tails
    #[default]
    Standard,
    /// Dynamic lengths, then static values, then dynamic contents
    Legacy,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Standard => write!(f, "standard"),
            Layout::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for Layout {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Layout::Standard),
            "legacy" => Ok(Layout::Legacy),
            other => Err(AbiError::Json(format!("unknown layout: {}", other))),
        }
    }
}

/// Options shared by an [`Interface`](crate::Interface) and everything built from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Parameter block layout
    pub layout: Layout,
    /// Fail with [`AbiError::OverloadResolution`] instead of returning empty call data
    pub strict_overloads: bool,
}

impl CodecOptions {
    /// Options using the legacy layout
    pub fn legacy() -> Self {
        Self {
            layout: Layout::Legacy,
            ..Self::default()
        }
    }

    /// Set strict overload resolution
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_overloads = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodecOptions::default();
        assert_eq!(options.layout, Layout::Standard);
        assert!(!options.strict_overloads);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: CodecOptions = serde_json::from_str(r#"{"layout":"legacy"}"#).unwrap();
        assert_eq!(options, CodecOptions::legacy());

        let options: CodecOptions = serde_json::from_str(r#"{"strict_overloads":true}"#).unwrap();
        assert_eq!(options, CodecOptions::default().strict(true));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("Legacy".parse::<Layout>().unwrap(), Layout::Legacy);
        assert_eq!("standard".parse::<Layout>().unwrap(), Layout::Standard);
        assert!("packed".parse::<Layout>().is_err());
        assert_eq!(Layout::Legacy.to_string(), "legacy");
    }
}
