use thiserror::Error;

use crate::bencode::{BencodeError, DecodeError};

/// Errors that can occur when parsing torrent files.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The bencode is well formed but does not fit the metainfo layout.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing from the torrent file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The info hash has an invalid length (must be 20 bytes).
    #[error("invalid info hash length")]
    InvalidInfoHashLength,
}
