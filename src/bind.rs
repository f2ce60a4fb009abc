//! Binding decoded dictionaries onto typed records.
//!
//! A record is a plain struct whose fields each carry a tag naming the
//! dictionary key they come from, optionally followed by `omitempty`. The
//! [`record!`](crate::record) macro declares the struct and its field table
//! in one go:
//!
//! ```
//! use ben::bind::{self, Timestamp};
//!
//! ben::record! {
//!     #[derive(Debug)]
//!     pub struct Announce {
//!         pub url: String => "announce",
//!         pub created: Option<Timestamp> => "creation date,omitempty",
//!         pub tiers: Vec<Vec<String>> => "announce-list,omitempty",
//!     }
//! }
//!
//! # fn main() -> Result<(), ben::bencode::DecodeError> {
//! let announce: Announce =
//!     bind::from_bytes(b"d8:announce10:udp://x:8013:creation datei1711786644ee")?;
//! assert_eq!(announce.url, "udp://x:80");
//! assert_eq!(announce.created.map(|t| t.timestamp()), Some(1711786644));
//! assert!(announce.tiers.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Resolution
//!
//! Each field is bound through its type's [`Bind`] impl:
//!
//! - named types with a dedicated conversion: [`Timestamp`] (Unix seconds),
//!   [`Sha1Hash`] (20-byte digests, packed when in a `Vec`), and every
//!   record, which recurses into the sub-dictionary;
//! - otherwise the structural shape: integers, `bool`, `String`,
//!   [`Bytes`](bytes::Bytes), `Option<T>`, `Vec<T>` (a `Vec<u8>` is a
//!   single byte string), and `BTreeMap<String, T>`.
//!
//! Missing required keys fail with [`BencodeError::MissingField`]; any other
//! failure is wrapped in [`BencodeError::Field`] naming the key.

mod named;
mod shapes;
mod tag;

pub use named::{Sha1Hash, Timestamp};
pub use shapes::{Bind, Unbind};
pub use tag::Tag;

pub(crate) use named::{hex_decode, hex_encode};

use crate::bencode::{decode, decode_one, encode, BencodeError, ByteSource, DecodeError, Value};
use bytes::Bytes;
use std::collections::BTreeMap;
use tracing::trace;

/// One entry of a record's field table.
pub struct FieldSpec<T> {
    /// Key name plus modifiers, e.g. `"created by,omitempty"`.
    pub tag: &'static str,
    pub bind: fn(&mut T, &Value) -> Result<(), BencodeError>,
    pub unbind: fn(&T) -> Result<Option<Value>, BencodeError>,
}

/// A struct that can be bound from a dictionary field by field.
///
/// Usually implemented through [`record!`](crate::record).
pub trait Record: Default + 'static {
    const FIELDS: &'static [FieldSpec<Self>];
}

/// Binds `dict` into a fresh `T`.
///
/// Nothing is returned unless every field bound, so a failure never leaves
/// a half-populated record behind.
pub fn bind_record<T: Record>(dict: &BTreeMap<Bytes, Value>) -> Result<T, BencodeError> {
    let mut record = T::default();

    for field in T::FIELDS {
        let tag = Tag::parse(field.tag);
        match dict.get(tag.key.as_bytes()) {
            Some(value) => {
                (field.bind)(&mut record, value).map_err(|e| e.in_field(tag.key))?;
                trace!(key = tag.key, "field bound");
            }
            None if tag.omit_empty => trace!(key = tag.key, "optional field absent"),
            None => return Err(BencodeError::MissingField(tag.key.to_string())),
        }
    }

    Ok(record)
}

/// Builds the dictionary for `record`.
///
/// An `omitempty` field with nothing to emit is left out. A required field
/// with nothing to emit fails with [`BencodeError::MissingField`], since
/// the resulting dictionary could not be bound back.
pub fn record_to_value<T: Record>(record: &T) -> Result<Value, BencodeError> {
    let mut dict = BTreeMap::new();

    for field in T::FIELDS {
        let tag = Tag::parse(field.tag);
        match (field.unbind)(record).map_err(|e| e.in_field(tag.key))? {
            Some(value) => {
                dict.insert(Bytes::copy_from_slice(tag.key.as_bytes()), value);
            }
            None if tag.omit_empty => trace!(key = tag.key, "optional field omitted"),
            None => return Err(BencodeError::MissingField(tag.key.to_string())),
        }
    }

    Ok(Value::Dict(dict))
}

/// Decodes one dictionary from `source` and binds it into `T`.
pub fn decode_typed<T: Record, S: ByteSource>(source: S) -> Result<T, DecodeError> {
    let value = decode_one(source)?;
    Ok(bind_record(value.try_dict()?)?)
}

/// Decodes a complete buffer and binds it into `T`.
pub fn from_bytes<T: Record>(data: &[u8]) -> Result<T, DecodeError> {
    let value = decode(data)?;
    Ok(bind_record(value.try_dict()?)?)
}

/// Encodes a record as a bencoded dictionary.
pub fn to_bytes<T: Record>(record: &T) -> Result<Vec<u8>, BencodeError> {
    Ok(encode(&record_to_value(record)?))
}

/// Declares a struct together with its [`Record`] field table.
///
/// Each field is written `name: Type => "tag"`. The struct additionally
/// derives `Default` and gets [`Bind`]/[`Unbind`] impls, so it can be nested
/// inside other records.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty => $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::bind::Record for $name {
            const FIELDS: &'static [$crate::bind::FieldSpec<Self>] = &[
                $(
                    $crate::bind::FieldSpec {
                        tag: $tag,
                        bind: |record, value| $crate::bind::Bind::bind(&mut record.$field, value),
                        unbind: |record| $crate::bind::Unbind::unbind(&record.$field),
                    },
                )*
            ];
        }

        impl $crate::bind::Bind for $name {
            fn bind(
                &mut self,
                value: &$crate::bencode::Value,
            ) -> ::std::result::Result<(), $crate::bencode::BencodeError> {
                *self = $crate::bind::bind_record(value.try_dict()?)?;
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::bind::Unbind for $name {
            fn unbind(
                &self,
            ) -> ::std::result::Result<
                ::std::option::Option<$crate::bencode::Value>,
                $crate::bencode::BencodeError,
            > {
                $crate::bind::record_to_value(self).map(::std::option::Option::Some)
            }
        }
    };
}
