use super::error::{BencodeError, DecodeError};
use super::reader::{ByteSource, IoReader, SliceReader};
use super::value::Value;
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_STRING_LENGTH, DICT_START, INT_START, LENGTH_DELIMITER,
    LIST_START, SEQ_END,
};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::trace;

/// Limits and strictness switches applied while decoding.
///
/// # Examples
///
/// ```
/// use ben::bencode::{DecoderOptions, decode_with};
///
/// let options = DecoderOptions::default().max_depth(1);
/// assert!(decode_with(b"li1ee", options).is_ok());
/// assert!(decode_with(b"llee", options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Deepest allowed nesting of lists and dictionaries.
    pub max_depth: usize,
    /// Largest declared byte string length, checked before reading the payload.
    pub max_string_length: usize,
    /// Reject integers with leading zeros and `-0`.
    pub strict_integers: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            strict_integers: false,
        }
    }
}

impl DecoderOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn strict_integers(mut self, strict: bool) -> Self {
        self.strict_integers = strict;
        self
    }
}

/// A recursive-descent bencode decoder over a [`ByteSource`].
///
/// Every decision is taken on a single byte of lookahead, so the decoder can
/// run directly on a stream. Bytes after the first complete value are left
/// in the source.
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    options: DecoderOptions,
    depth: usize,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    pub fn with_options(source: S, options: DecoderOptions) -> Self {
        Self {
            source,
            options,
            depth: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decodes exactly one value.
    ///
    /// A sequence terminator in value position is reported as
    /// [`BencodeError::UnexpectedEndOfSequence`].
    pub fn decode_value(&mut self) -> Result<Value, DecodeError> {
        self.next_value()?
            .ok_or_else(|| BencodeError::UnexpectedEndOfSequence.into())
    }

    /// Dispatches on the next byte and decodes the value it introduces.
    ///
    /// Returns `Ok(None)` when the next byte is the sequence terminator. The
    /// terminator is not consumed; the enclosing list or dictionary does that.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        let marker = self.source.peek_byte()?;
        trace!(
            marker = %char::from(marker),
            position = self.source.position(),
            "dispatch"
        );

        let value = match marker {
            DICT_START => self.nested(Self::decode_dict)?,
            INT_START => self.decode_integer()?,
            LIST_START => self.nested(Self::decode_list)?,
            b'0'..=b'9' => Value::Bytes(self.decode_bytes()?),
            SEQ_END => return Ok(None),
            other => return Err(BencodeError::UnknownTypeMarker(other).into()),
        };

        Ok(Some(value))
    }

    fn nested(
        &mut self,
        decode: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(BencodeError::NestingTooDeep.into());
        }
        self.depth += 1;
        let result = decode(self);
        self.depth -= 1;
        result
    }

    fn decode_integer(&mut self) -> Result<Value, DecodeError> {
        self.source.read_byte()?;

        let mut value: i64 = 0;
        let mut negative = false;
        let mut digits = 0usize;

        loop {
            let byte = self.source.read_byte()?;
            match byte {
                SEQ_END => break,
                b'-' if digits == 0 && !negative => negative = true,
                b'0'..=b'9' => {
                    if self.options.strict_integers && digits > 0 && value == 0 {
                        return Err(BencodeError::InvalidInteger("leading zeros".into()).into());
                    }
                    let digit = i64::from(byte - b'0');
                    value = value
                        .checked_mul(10)
                        .and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        })
                        .ok_or_else(|| BencodeError::InvalidInteger("overflow".into()))?;
                    digits += 1;
                }
                other => return Err(BencodeError::InvalidIntegerByte(other).into()),
            }
        }

        if digits == 0 {
            return Err(BencodeError::InvalidInteger("no digits".into()).into());
        }
        if self.options.strict_integers && negative && value == 0 {
            return Err(BencodeError::InvalidInteger("negative zero".into()).into());
        }

        Ok(Value::Integer(value))
    }

    fn decode_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let mut len: usize = 0;
        let mut digits = 0usize;

        loop {
            let byte = self.source.read_byte()?;
            let invalid = || BencodeError::InvalidStringLength {
                byte,
                position: self.source.position().saturating_sub(1),
            };
            match byte {
                LENGTH_DELIMITER if digits > 0 => break,
                b'0'..=b'9' => {
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(byte - b'0')))
                        .ok_or_else(invalid)?;
                    digits += 1;
                }
                _ => return Err(invalid().into()),
            }
        }

        if len > self.options.max_string_length {
            return Err(BencodeError::StringTooLong {
                len,
                max: self.options.max_string_length,
            }
            .into());
        }

        Ok(self.source.read_exact(len)?)
    }

    fn decode_list(&mut self) -> Result<Value, DecodeError> {
        self.source.read_byte()?;
        let mut list = Vec::new();

        loop {
            match self.next_value() {
                Ok(Some(value)) => list.push(value),
                Ok(None) => break,
                Err(err) => {
                    trace!(decoded = list.len(), "list aborted");
                    return Err(DecodeError::with_partial(
                        err.into_error(),
                        Value::List(list),
                    ));
                }
            }
        }

        self.source.read_byte()?;
        trace!(len = list.len(), "list closed");
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self) -> Result<Value, DecodeError> {
        self.source.read_byte()?;
        let mut dict = BTreeMap::new();

        loop {
            let marker = self.source.peek_byte()?;
            if marker == SEQ_END {
                break;
            }
            if !marker.is_ascii_digit() {
                return Err(BencodeError::InvalidKey(marker).into());
            }

            let key = self.decode_bytes()?;
            let value = self
                .next_value()
                .map_err(DecodeError::without_partial)?
                .ok_or_else(|| {
                    BencodeError::KeyWithoutValue(String::from_utf8_lossy(&key).into_owned())
                })?;

            // Duplicate keys: last one wins.
            dict.insert(key, value);
        }

        self.source.read_byte()?;
        trace!(len = dict.len(), "dictionary closed");
        Ok(Value::Dict(dict))
    }
}

/// Decodes a complete buffer holding exactly one value.
///
/// Bytes left over after the value are an error
/// ([`BencodeError::TrailingData`]); the decoded value is still available
/// through [`DecodeError::partial`].
///
/// # Examples
///
/// ```
/// use ben::bencode::{decode, Value};
///
/// assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
/// assert!(decode(b"i42eextra").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    decode_with(data, DecoderOptions::default())
}

pub fn decode_with(data: &[u8], options: DecoderOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::with_options(SliceReader::new(data), options);
    let value = decoder.decode_value()?;

    if !decoder.source().is_empty() {
        return Err(DecodeError::with_partial(BencodeError::TrailingData, value));
    }

    Ok(value)
}

/// Decodes one value from the front of `source`, leaving the rest unread.
///
/// # Examples
///
/// ```
/// use ben::bencode::{decode_one, SliceReader};
///
/// let mut reader = SliceReader::new(b"3:abcdef");
/// let value = decode_one(&mut reader).unwrap();
/// assert_eq!(value.as_str(), Some("abc"));
/// assert_eq!(reader.remaining(), b"def");
/// ```
pub fn decode_one<S: ByteSource>(source: S) -> Result<Value, DecodeError> {
    Decoder::new(source).decode_value()
}

/// Decodes one value from a buffered reader such as a `BufReader<File>`.
pub fn decode_reader<R: BufRead>(reader: R) -> Result<Value, DecodeError> {
    decode_one(IoReader::new(reader))
}
