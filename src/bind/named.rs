use super::shapes::{Bind, Unbind};
use crate::bencode::{BencodeError, Value};
use crate::constants::SHA1_LEN;
use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use std::fmt;

/// A point in time stored on the wire as Unix-epoch seconds.
pub type Timestamp = DateTime<Utc>;

impl Bind for DateTime<Utc> {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        let secs = value.try_integer()?;
        *self = DateTime::from_timestamp(secs, 0).ok_or(BencodeError::IntegerOutOfRange(secs))?;
        Ok(())
    }
}

impl Unbind for DateTime<Utc> {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::Integer(self.timestamp())))
    }
}

/// A single 20-byte SHA-1 digest.
///
/// On its own it binds from a 20-byte string. A `Vec<Sha1Hash>` binds from
/// one string of concatenated digests, which is how `pieces` is stored.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha1Hash(pub [u8; SHA1_LEN]);

impl Sha1Hash {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BencodeError> {
        let arr: [u8; SHA1_LEN] = bytes.try_into().map_err(|_| BencodeError::InvalidField {
            field: "sha1 hash",
            reason: format!("expected {SHA1_LEN} bytes, got {}", bytes.len()),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl Bind for Sha1Hash {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        *self = Sha1Hash::from_slice(value.try_bytes()?)?;
        Ok(())
    }

    fn bind_seq(seq: &mut Vec<Self>, value: &Value) -> Result<(), BencodeError> {
        let bytes = value.try_bytes()?;
        if bytes.len() % SHA1_LEN != 0 {
            return Err(BencodeError::InvalidField {
                field: "sha1 hashes",
                reason: format!("length {} is not a multiple of {SHA1_LEN}", bytes.len()),
            });
        }
        *seq = bytes
            .chunks_exact(SHA1_LEN)
            .map(Sha1Hash::from_slice)
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

impl Unbind for Sha1Hash {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::Bytes(Bytes::copy_from_slice(&self.0))))
    }

    fn unbind_seq(seq: &[Self]) -> Result<Value, BencodeError> {
        let mut buf = BytesMut::with_capacity(seq.len() * SHA1_LEN);
        for hash in seq {
            buf.put_slice(&hash.0);
        }
        Ok(Value::Bytes(buf.freeze()))
    }
}

impl From<[u8; SHA1_LEN]> for Sha1Hash {
    fn from(arr: [u8; SHA1_LEN]) -> Self {
        Self(arr)
    }
}

impl fmt::Debug for Sha1Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Hash({})", self.to_hex())
    }
}

impl fmt::Display for Sha1Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
        s
    })
}

pub(crate) fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
