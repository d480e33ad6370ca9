//! Configuration for huff-tree

use serde::{Deserialize, Serialize};

use crate::error::CompressError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest input, in bytes, that `compress` accepts.
    pub max_input_size: u64,
    /// Largest output, in bytes, that `decompress` will produce.
    pub max_output_size: u64,
}

impl CompressionConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        serde_json::from_str(json).map_err(|e| CompressError::SerializationError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CompressError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompressError::SerializationError(e.to_string()))
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            // no cap unless the caller opts in
            max_input_size: u64::MAX,
            max_output_size: u64::MAX,
        }
    }
}
