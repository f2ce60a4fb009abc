use super::value::Value;
use thiserror::Error;

/// Errors raised while decoding bencode or binding a value tree.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// The byte source ran out in the middle of a token.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A byte other than a digit (or a leading `-`) inside `i...e`.
    #[error("invalid byte in integer: 0x{0:02x}")]
    InvalidIntegerByte(u8),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// A byte that cannot extend a string length prefix, or a digit that
    /// overflows it. `position` is the offset of that byte in the source.
    #[error("invalid byte in string length: 0x{byte:02x} at offset {position}")]
    InvalidStringLength { byte: u8, position: usize },

    #[error("string length {len} exceeds limit of {max} bytes")]
    StringTooLong { len: usize, max: usize },

    #[error("unknown type marker: 0x{0:02x}")]
    UnknownTypeMarker(u8),

    /// A dictionary key that does not start like a byte string.
    #[error("dictionary key must be a byte string, found 0x{0:02x}")]
    InvalidKey(u8),

    #[error("key without value: {0}")]
    KeyWithoutValue(String),

    /// An `e` marker where a value was required.
    #[error("unexpected end of item sequence")]
    UnexpectedEndOfSequence,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("trailing data after value")]
    TrailingData,

    /// A value accessor was called against the wrong shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("byte string is not valid utf-8")]
    InvalidUtf8,

    #[error("integer {0} out of range for target type")]
    IntegerOutOfRange(i64),

    /// An unsigned field holds a value that no bencode integer can carry.
    #[error("integer {0} does not fit in a bencode integer")]
    IntegerTooLarge(u64),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("missing field: {0}")]
    MissingField(String),

    /// No binder handles the target type.
    #[error("type not supported: {0}")]
    Unsupported(&'static str),

    /// A failure while binding the named dictionary key.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<BencodeError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`BencodeError`].
///
/// Every error maps to exactly one kind, which is what callers deciding
/// whether to abort or salvage a partial tree usually match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input ended mid-token.
    EndOfStream,
    /// Malformed token or trailing garbage.
    InvalidInput,
    /// A sequence terminator appeared where a value was expected.
    EndOfSequence,
    /// A value had a different shape than requested.
    TypeMismatch,
    /// The binder has no handler for a type.
    Unsupported,
    /// A required dictionary key was absent.
    MissingField,
    /// A configured decoder limit was hit.
    LimitExceeded,
    /// The underlying reader failed.
    Io,
}

impl BencodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BencodeError::UnexpectedEof => ErrorKind::EndOfStream,
            BencodeError::InvalidIntegerByte(_)
            | BencodeError::InvalidInteger(_)
            | BencodeError::InvalidStringLength { .. }
            | BencodeError::UnknownTypeMarker(_)
            | BencodeError::InvalidKey(_)
            | BencodeError::KeyWithoutValue(_)
            | BencodeError::TrailingData
            | BencodeError::InvalidUtf8
            | BencodeError::IntegerOutOfRange(_)
            | BencodeError::IntegerTooLarge(_)
            | BencodeError::InvalidField { .. } => ErrorKind::InvalidInput,
            BencodeError::StringTooLong { .. } | BencodeError::NestingTooDeep => {
                ErrorKind::LimitExceeded
            }
            BencodeError::UnexpectedEndOfSequence => ErrorKind::EndOfSequence,
            BencodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            BencodeError::MissingField(_) => ErrorKind::MissingField,
            BencodeError::Unsupported(_) => ErrorKind::Unsupported,
            BencodeError::Field { source, .. } => source.kind(),
            BencodeError::Io(_) => ErrorKind::Io,
        }
    }

    /// Attaches the dictionary key being bound when this error surfaced.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        BencodeError::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Strips [`BencodeError::Field`] wrappers and returns the innermost error.
    pub fn root_cause(&self) -> &BencodeError {
        match self {
            BencodeError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A decode failure, possibly accompanied by the part of the tree that was
/// decoded before it.
///
/// Only lists produce a partial value: a list that fails keeps the elements
/// already decoded at its own level, so `li234e4:abcdi24` fails with
/// [`BencodeError::UnexpectedEof`] while still exposing `[234, "abcd"]`.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DecodeError {
    error: BencodeError,
    partial: Option<Value>,
}

impl DecodeError {
    pub(crate) fn with_partial(error: BencodeError, partial: Value) -> Self {
        Self {
            error,
            partial: Some(partial),
        }
    }

    pub fn error(&self) -> &BencodeError {
        &self.error
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// The value decoded before the failure, if any.
    pub fn partial(&self) -> Option<&Value> {
        self.partial.as_ref()
    }

    pub fn into_parts(self) -> (BencodeError, Option<Value>) {
        (self.error, self.partial)
    }

    pub fn into_error(self) -> BencodeError {
        self.error
    }

    pub(crate) fn without_partial(self) -> Self {
        Self {
            error: self.error,
            partial: None,
        }
    }
}

impl From<BencodeError> for DecodeError {
    fn from(error: BencodeError) -> Self {
        Self {
            error,
            partial: None,
        }
    }
}

impl From<DecodeError> for BencodeError {
    fn from(err: DecodeError) -> Self {
        err.error
    }
}
