use super::value::Value;
use crate::constants::{DICT_START, INT_START, LENGTH_DELIMITER, LIST_START, SEQ_END};
use std::io::{self, Write};

/// Encodes a bencode value to a byte vector.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted lexicographically)
///
/// Encoding an in-memory value cannot fail.
///
/// # Examples
///
/// ```
/// use ben::bencode::{encode, Value};
///
/// assert_eq!(encode(&Value::Integer(12)), b"i12e");
/// assert_eq!(encode(&Value::string("Hello World!")), b"12:Hello World!");
///
/// let list = Value::List(vec![Value::Integer(42), Value::string("Hello")]);
/// assert_eq!(encode(&list), b"li42e5:Helloe");
/// ```
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writing into a Vec never fails.
    let _ = encode_value(value, &mut buf);
    buf
}

/// Encodes a value straight into a writer, without buffering the whole
/// output first.
///
/// # Errors
///
/// Returns the first error reported by `writer`.
pub fn encode_to<W: Write>(value: &Value, mut writer: W) -> io::Result<()> {
    encode_value(value, &mut writer)
}

fn encode_value<W: Write>(value: &Value, writer: &mut W) -> io::Result<()> {
    match value {
        Value::Integer(i) => {
            write!(writer, "{}{}{}", char::from(INT_START), i, char::from(SEQ_END))?;
        }
        Value::Bytes(b) => encode_bytes(b, writer)?,
        Value::List(l) => {
            writer.write_all(&[LIST_START])?;
            for item in l {
                encode_value(item, writer)?;
            }
            writer.write_all(&[SEQ_END])?;
        }
        Value::Dict(d) => {
            writer.write_all(&[DICT_START])?;
            for (key, val) in d {
                encode_bytes(key, writer)?;
                encode_value(val, writer)?;
            }
            writer.write_all(&[SEQ_END])?;
        }
    }
    Ok(())
}

fn encode_bytes<W: Write>(bytes: &[u8], writer: &mut W) -> io::Result<()> {
    write!(writer, "{}{}", bytes.len(), char::from(LENGTH_DELIMITER))?;
    writer.write_all(bytes)
}
