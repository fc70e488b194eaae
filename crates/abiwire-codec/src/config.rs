//! Codec configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Shape of decoded parameter lists and tuples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Positional values
    #[default]
    Array,
    /// Name-keyed records wherever every member is named
    Object,
}

/// Decoder options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Result shape
    #[serde(default)]
    pub mode: DecodeMode,
    /// Reject non-zero padding around addresses, `bytesN` and dynamic
    /// byte payloads, and require the padding to be present
    #[serde(default = "default_strict_padding")]
    pub strict_padding: bool,
}

fn default_strict_padding() -> bool {
    true
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            mode: DecodeMode::Array,
            strict_padding: default_strict_padding(),
        }
    }
}

impl DecodeOptions {
    /// Default options in object mode
    pub fn object() -> Self {
        Self {
            mode: DecodeMode::Object,
            ..Self::default()
        }
    }

    /// Accept dirty or missing padding
    pub fn lenient(mut self) -> Self {
        self.strict_padding = false;
        self
    }
}

/// Resolver and facade configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Options used when decoding results, calls and logs
    #[serde(default)]
    pub decode: DecodeOptions,
    /// Memoize signature hashes
    #[serde(default = "default_cache_signatures")]
    pub cache_signatures: bool,
}

fn default_cache_signatures() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            cache_signatures: default_cache_signatures(),
        }
    }
}

impl CodecConfig {
    /// Load from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
