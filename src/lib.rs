//! ben - Bencode codec and struct binder
//!
//! Decodes and encodes the BitTorrent serialization format ([BEP-3]) and
//! projects decoded dictionaries onto typed records without a schema
//! compiler.
//!
//! # Modules
//!
//! - [`bencode`] - Value tree, streaming decoder, encoder
//! - [`bind`] - Tag-driven binding between dictionaries and records
//! - [`metainfo`] - Torrent metainfo records built on the binder
//! - [`constants`] - Wire markers and decoder limits
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod bind;
pub mod constants;
pub mod metainfo;

pub use bencode::{
    decode, decode_one, decode_reader, encode, BencodeError, DecodeError, DecoderOptions,
    ErrorKind, Value,
};
pub use bind::{decode_typed, Bind, Record, Sha1Hash, Timestamp, Unbind};
pub use metainfo::{InfoHash, Metainfo, MetainfoError, Torrent};
