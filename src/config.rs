//! Writer options shared by the block builders
//!
//! A single `WriterOptions` value configures both block kinds:
//! - `max_block_bytes`: upper bound on a sealed block's size. `add` returns a
//!   short count once the next value would cross it.
//! - `restart_interval`: number of strings between restart points in a
//!   string block. Ignored by integer blocks.
//!
//! Options can be built in code or loaded from TOML/JSON:
//!
//! ```toml
//! max_block_bytes = 65536
//! restart_interval = 16
//! ```

use crate::error::{BlockError, Result};
use crate::group_varint::MAX_GROUP_LEN;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default block budget (256KB)
pub const DEFAULT_MAX_BLOCK_BYTES: usize = 256 * 1024;

/// Default spacing of string block restart points
pub const DEFAULT_RESTART_INTERVAL: usize = 16;

/// Smallest budget that still leaves room for a header and one group
pub const MIN_MAX_BLOCK_BYTES: usize = 2 * MAX_GROUP_LEN;

/// Writer options for integer and string block builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterOptions {
    /// Maximum encoded size of a single block in bytes
    pub max_block_bytes: usize,

    /// Strings between restart points (string blocks only)
    pub restart_interval: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            max_block_bytes: DEFAULT_MAX_BLOCK_BYTES,
            restart_interval: DEFAULT_RESTART_INTERVAL,
        }
    }
}

impl WriterOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block byte budget
    pub fn with_max_block_bytes(mut self, max_block_bytes: usize) -> Self {
        self.max_block_bytes = max_block_bytes;
        self
    }

    /// Set the string block restart interval
    pub fn with_restart_interval(mut self, restart_interval: usize) -> Self {
        self.restart_interval = restart_interval;
        self
    }

    /// Validate all fields
    ///
    /// Checks:
    /// - `max_block_bytes` is at least [`MIN_MAX_BLOCK_BYTES`] and fits in `u32`
    /// - `restart_interval` is non-zero and fits in `u32`
    pub fn validate(&self) -> Result<()> {
        if self.max_block_bytes < MIN_MAX_BLOCK_BYTES {
            return Err(BlockError::InvalidConfig(format!(
                "max_block_bytes must be at least {} (got {})",
                MIN_MAX_BLOCK_BYTES, self.max_block_bytes
            )));
        }

        if self.max_block_bytes > u32::MAX as usize {
            return Err(BlockError::InvalidConfig(format!(
                "max_block_bytes must fit in u32 (got {})",
                self.max_block_bytes
            )));
        }

        if self.restart_interval == 0 {
            return Err(BlockError::InvalidConfig(
                "restart_interval must be non-zero".to_string(),
            ));
        }

        if self.restart_interval > u32::MAX as usize {
            return Err(BlockError::InvalidConfig(format!(
                "restart_interval must fit in u32 (got {})",
                self.restart_interval
            )));
        }

        Ok(())
    }

    /// Parse and validate options from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: WriterOptions = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate options from a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        let options: WriterOptions = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            other => {
                tracing::warn!(
                    "Unrecognized options file extension {:?} for {}, parsing as TOML",
                    other,
                    path.display()
                );
                Self::from_toml_str(&contents)
            }
        }
    }
}
