//! Error taxonomy for the codec.
//!
//! Every decode step either fully builds its return value or returns one of
//! these variants; no partial value ever escapes to the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BanchoError>;

#[derive(Debug, Error)]
pub enum BanchoError {
    #[error("unexpected end of stream: needed {needed} bytes, had {available}")]
    UnexpectedEof { needed: usize, available: usize },

    #[error("malformed string: {0}")]
    MalformedString(String),

    #[error("gzip stream is malformed or exceeds the decompression limit")]
    DecompressionFailed,

    #[error("packet {canonical_id} is not supported by dialect {build_number}")]
    UnsupportedPacket {
        canonical_id: u16,
        build_number: u32,
    },

    #[error("value for canonical id {canonical_id} does not match the expected shape: {reason}")]
    TypeMismatch { canonical_id: u16, reason: String },

    #[error("source read failed: {0}")]
    SourceError(String),

    #[error("sink write failed: {0}")]
    SinkError(String),
}

impl BanchoError {
    pub fn eof(needed: usize, available: usize) -> Self {
        BanchoError::UnexpectedEof { needed, available }
    }
}

impl From<std::io::Error> for BanchoError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            BanchoError::eof(0, 0)
        } else {
            BanchoError::SourceError(e.to_string())
        }
    }
}
