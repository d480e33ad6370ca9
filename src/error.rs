//! Error types for huff-tree

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("bad magic number {}, expected {:#010x}", describe_magic(.found), crate::HUFF_TREE)]
    BadMagic { found: Option<u32> },

    #[error("malformed tree header: {0}")]
    MalformedHeader(String),

    #[error("compressed body ended before the end-of-stream code")]
    TruncatedStream,

    #[error("no code for symbol {0}")]
    UnknownSymbol(u16),

    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("decompressed output exceeds the {limit} byte limit")]
    OutputLimitExceeded { limit: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        Some(value) => format!("{value:#010x}"),
        None => "<end of stream>".to_string(),
    }
}
