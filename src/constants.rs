//! Codec limits and format constants.
//!
//! The limits are defaults for [`DecoderOptions`](crate::bencode::DecoderOptions);
//! callers decoding untrusted input may tighten them further.

// ============================================================================
// Wire markers
// ============================================================================

/// Start of a dictionary (`d...e`)
pub const DICT_START: u8 = b'd';

/// Start of an integer (`i...e`)
pub const INT_START: u8 = b'i';

/// Start of a list (`l...e`)
pub const LIST_START: u8 = b'l';

/// Terminator shared by integers, lists and dictionaries
pub const SEQ_END: u8 = b'e';

/// Separates a byte string's declared length from its payload
pub const LENGTH_DELIMITER: u8 = b':';

// ============================================================================
// Decoder limits
// ============================================================================

/// Maximum nesting of lists and dictionaries before decoding is refused
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Largest declared byte string length accepted (64 MiB)
/// Checked before any allocation so a forged prefix cannot exhaust memory
pub const DEFAULT_MAX_STRING_LENGTH: usize = 64 * 1024 * 1024;

// ============================================================================
// Metainfo
// ============================================================================

/// Width of one SHA-1 digest in the `pieces` string
pub const SHA1_LEN: usize = 20;
