//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use ben::bencode::{decode, Value};
//!
//! let value = decode(b"d6:answeri42e8:question16:to be determinede").unwrap();
//! assert_eq!(value.get(b"answer"), Some(&Value::Integer(42)));
//! assert_eq!(value.get(b"question").and_then(|v| v.as_str()), Some("to be determined"));
//! ```
//!
//! ## Decoding from a stream
//!
//! The decoder only ever looks one byte ahead, so it works on any
//! [`std::io::BufRead`] without loading the whole message:
//!
//! ```
//! use ben::bencode::decode_reader;
//! use std::io::Cursor;
//!
//! let value = decode_reader(Cursor::new(b"l4:spami42ee".to_vec())).unwrap();
//! assert_eq!(value.as_list().map(|l| l.len()), Some(2));
//! ```
//!
//! ## Recovering a partial list
//!
//! ```
//! use ben::bencode::{decode, ErrorKind, Value};
//!
//! let err = decode(b"li234e4:abcdi24").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::EndOfStream);
//!
//! let partial = err.partial().and_then(|v| v.as_list()).unwrap();
//! assert_eq!(partial, &vec![Value::Integer(234), Value::string("abcd")]);
//! ```
//!
//! # Error Handling
//!
//! Every [`BencodeError`] belongs to exactly one [`ErrorKind`]:
//!
//! - [`ErrorKind::EndOfStream`] - input ended inside a token
//! - [`ErrorKind::InvalidInput`] - malformed integer, length prefix, type
//!   marker, key, or trailing bytes
//! - [`ErrorKind::EndOfSequence`] - an `e` where a value was required
//! - [`ErrorKind::LimitExceeded`] - [`DecoderOptions`] depth or length limit hit
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod reader;
mod value;

pub use decode::{decode, decode_one, decode_reader, decode_with, Decoder, DecoderOptions};
pub use encode::{encode, encode_to};
pub use error::{BencodeError, DecodeError, ErrorKind};
pub use reader::{ByteSource, IoReader, SliceReader};
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests;
