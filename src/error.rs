use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Corrupt block header: {0}")]
    CorruptHeader(String),

    #[error("Corrupt block body: {0}")]
    CorruptBody(String),

    #[error("Decoder is unusable after a failed header parse")]
    DecoderFailed,

    #[error("Ordinal overflow: base {base} + count {count} does not fit in u32")]
    OrdinalOverflow { base: u32, count: usize },

    #[error("Invalid writer options: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BlockError>;
