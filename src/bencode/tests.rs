use std::collections::BTreeMap;
use std::io::{BufReader, Cursor, Seek, SeekFrom, Write};

use bytes::Bytes;

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
    assert_eq!(decode(b"i71183928e").unwrap(), Value::Integer(71183928));
}

#[test]
fn test_decode_integer_extremes() {
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        Value::Integer(i64::MIN)
    );

    let err = decode(b"i9223372036854775808e").unwrap_err();
    assert!(matches!(err.error(), BencodeError::InvalidInteger(_)));
}

#[test]
fn test_decode_integer_invalid_byte() {
    let err = decode(b"i9809d3:abc").unwrap_err();
    assert!(matches!(err.error(), BencodeError::InvalidIntegerByte(b'd')));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(matches!(
        decode(b"i1-2e").unwrap_err().error(),
        BencodeError::InvalidIntegerByte(b'-')
    ));
    assert!(matches!(
        decode(b"i--2e").unwrap_err().error(),
        BencodeError::InvalidIntegerByte(b'-')
    ));
}

#[test]
fn test_decode_integer_without_digits() {
    assert!(matches!(
        decode(b"ie").unwrap_err().error(),
        BencodeError::InvalidInteger(_)
    ));
    assert!(matches!(
        decode(b"i-e").unwrap_err().error(),
        BencodeError::InvalidInteger(_)
    ));
}

#[test]
fn test_decode_integer_lenient_by_default() {
    assert_eq!(decode(b"i03e").unwrap(), Value::Integer(3));
    assert_eq!(decode(b"i-0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_strict() {
    let strict = DecoderOptions::default().strict_integers(true);
    assert!(decode_with(b"i03e", strict).is_err());
    assert!(decode_with(b"i-0e", strict).is_err());
    assert!(decode_with(b"i00e", strict).is_err());
    assert_eq!(decode_with(b"i0e", strict).unwrap(), Value::Integer(0));
    assert_eq!(decode_with(b"i-30e", strict).unwrap(), Value::Integer(-30));
}

#[test]
fn test_decode_integer_truncated() {
    let err = decode(b"i1231").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));
    assert_eq!(err.kind(), ErrorKind::EndOfStream);
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam").unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(
        decode(b"0:").unwrap(),
        Value::Bytes(Bytes::from_static(b""))
    );
    assert_eq!(decode(b"9:Mi Amigos").unwrap().as_str(), Some("Mi Amigos"));
}

#[test]
fn test_decode_bytes_binary_payload() {
    let mut data = b"4:".to_vec();
    data.extend_from_slice(&[0xff, 0x00, b'e', b':']);
    let value = decode(&data).unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), &[0xff, 0x00, b'e', b':']);
    assert_eq!(value.as_str(), None);
}

#[test]
fn test_decode_bytes_truncated() {
    let err = decode(b"4:abc").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));

    let err = decode(b"0").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));
}

#[test]
fn test_decode_bytes_invalid_length() {
    assert!(matches!(
        decode(b"3x:abc").unwrap_err().error(),
        BencodeError::InvalidStringLength {
            byte: b'x',
            position: 1
        }
    ));
    assert!(matches!(
        decode(b"99999999999999999999999:a").unwrap_err().error(),
        BencodeError::InvalidStringLength { byte: b'9', .. }
    ));

    let err = decode(b"l12x:e").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid byte in string length: 0x78 at offset 3"
    );
}

#[test]
fn test_decode_bytes_length_limit() {
    let options = DecoderOptions::default().max_string_length(3);
    assert!(decode_with(b"3:abc", options).is_ok());

    let err = decode_with(b"4:abcd", options).unwrap_err();
    assert!(matches!(
        err.error(),
        BencodeError::StringTooLong { len: 4, max: 3 }
    ));
    assert_eq!(err.kind(), ErrorKind::LimitExceeded);
}

#[test]
fn test_decode_one_leaves_remainder() {
    let mut reader = SliceReader::new(b"3:abcdef");
    assert_eq!(decode_one(&mut reader).unwrap().as_str(), Some("abc"));
    assert_eq!(reader.remaining(), b"def");
    assert_eq!(reader.position(), 5);
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spami42ee").unwrap();
    match result {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], Value::Bytes(Bytes::from_static(b"spam")));
            assert_eq!(l[1], Value::Integer(42));
        }
        _ => panic!("expected list"),
    }

    let list = decode(b"li42ei100ei0ei12e4:namee").unwrap();
    let list = list.as_list().unwrap();
    assert_eq!(list.len(), 5);
    assert_eq!(list[0], Value::Integer(42));
    assert_eq!(list[4], Value::string("name"));
}

#[test]
fn test_decode_nested_lists() {
    let value = decode(b"llei1elli2eeee").unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::List(vec![]),
            Value::Integer(1),
            Value::List(vec![Value::List(vec![Value::Integer(2)])]),
        ])
    );
}

#[test]
fn test_decode_list_truncated() {
    let err = decode(b"li234e").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));
}

#[test]
fn test_decode_list_partial_result() {
    let err = decode(b"li234e4:abcdi24").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));

    let partial = err.partial().and_then(|v| v.as_list()).unwrap();
    assert_eq!(partial.len(), 2);
    assert_eq!(partial[0], Value::Integer(234));
    assert_eq!(partial[1], Value::string("abcd"));
}

#[test]
fn test_decode_nested_list_partial_is_outer_prefix() {
    let err = decode(b"li1eli2ei3").unwrap_err();
    let (error, partial) = err.into_parts();
    assert!(matches!(error, BencodeError::UnexpectedEof));
    assert_eq!(partial, Some(Value::List(vec![Value::Integer(1)])));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    match result {
        Value::Dict(d) => {
            assert_eq!(d.len(), 2);
            assert_eq!(
                d.get(&Bytes::from_static(b"cow")),
                Some(&Value::Bytes(Bytes::from_static(b"moo")))
            );
        }
        _ => panic!("expected dict"),
    }
}

#[test]
fn test_decode_dict_answer_question() {
    let value = decode(b"d6:answeri42e8:question16:to be determinede").unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(value.get(b"answer"), Some(&Value::Integer(42)));
    assert_eq!(
        value.get(b"question"),
        Some(&Value::string("to be determined"))
    );
}

#[test]
fn test_decode_dict_duplicate_key_last_wins() {
    let value = decode(b"d1:ai1e1:ai2ee").unwrap();
    assert_eq!(value.as_dict().unwrap().len(), 1);
    assert_eq!(value.get(b"a"), Some(&Value::Integer(2)));
}

#[test]
fn test_decode_dict_key_without_value() {
    let err = decode(b"d0:e").unwrap_err();
    assert!(matches!(err.error(), BencodeError::KeyWithoutValue(k) if k.is_empty()));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = decode(b"d3:fooe").unwrap_err();
    assert!(matches!(err.error(), BencodeError::KeyWithoutValue(k) if k == "foo"));
}

#[test]
fn test_decode_dict_non_string_key() {
    let err = decode(b"di1ei2ee").unwrap_err();
    assert!(matches!(err.error(), BencodeError::InvalidKey(b'i')));
}

#[test]
fn test_decode_dict_truncated_has_no_partial() {
    let err = decode(b"d1:ali1ei2").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));
    assert!(err.partial().is_none());
}

#[test]
fn test_decode_unknown_marker() {
    let err = decode(b"x").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnknownTypeMarker(b'x')));
}

#[test]
fn test_decode_bare_terminator() {
    let err = decode(b"e").unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEndOfSequence));
    assert_eq!(err.kind(), ErrorKind::EndOfSequence);
}

#[test]
fn test_dispatcher_reports_end_of_sequence() {
    let mut decoder = Decoder::new(SliceReader::new(b"e"));
    assert_eq!(decoder.next_value().unwrap(), None);
    // The terminator is left for the enclosing container.
    assert_eq!(decoder.source().position(), 0);
}

#[test]
fn test_decode_empty_input() {
    let err = decode(b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndOfStream);
}

#[test]
fn test_trailing_data_error() {
    let err = decode(b"i42eextra").unwrap_err();
    assert!(matches!(err.error(), BencodeError::TrailingData));
    assert_eq!(err.partial(), Some(&Value::Integer(42)));
}

#[test]
fn test_nesting_limit() {
    let options = DecoderOptions::default().max_depth(2);
    assert!(decode_with(b"llee", options).is_ok());

    let err = decode_with(b"llleee", options).unwrap_err();
    assert!(matches!(err.error(), BencodeError::NestingTooDeep));

    let deep = "l".repeat(100) + &"e".repeat(100);
    let err = decode(deep.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LimitExceeded);
}

fn dict(entries: &[(&str, Value)]) -> Value {
    Value::Dict(
        entries
            .iter()
            .map(|(k, v)| (Bytes::copy_from_slice(k.as_bytes()), v.clone()))
            .collect(),
    )
}

#[test]
fn test_malformed_corpus() {
    use ErrorKind::*;

    let cases: &[(&[u8], Result<Value, ErrorKind>)] = &[
        (b"i23e", Ok(Value::Integer(23))),
        (b"0", Err(EndOfStream)),
        (b"d0:e", Err(InvalidInput)),
        (b"d0:0:e", Ok(dict(&[("", Value::string(""))]))),
        (b"d1:a1:be", Ok(dict(&[("a", Value::string("b"))]))),
        (b"li1234:abcde", Err(InvalidInput)),
        (b"i12", Err(EndOfStream)),
        (b"5:abc", Err(EndOfStream)),
        (b"l", Err(EndOfStream)),
        (b"d", Err(EndOfStream)),
        (b"e", Err(EndOfSequence)),
        (b"-", Err(InvalidInput)),
        (b"d1:a", Err(EndOfStream)),
        (b"i-", Err(EndOfStream)),
    ];

    for (input, expected) in cases {
        let result = decode_one(SliceReader::new(input)).map_err(|e| e.kind());
        assert_eq!(&result, expected, "input {:?}", String::from_utf8_lossy(input));
    }

    let nested = decode_one(SliceReader::new(b"ld1:ai1eee")).unwrap();
    assert_eq!(nested.as_list().map(Vec::len), Some(1));
}

#[test]
fn test_malformed_corpus_errors() {
    let err = decode_one(SliceReader::new(b"d0:e")).unwrap_err();
    assert!(matches!(err.error(), BencodeError::KeyWithoutValue(key) if key.is_empty()));
    assert_eq!(err.partial(), None);

    // The colon ends the integer before any list element completes.
    let err = decode_one(SliceReader::new(b"li1234:abcde")).unwrap_err();
    assert!(matches!(err.error(), BencodeError::InvalidIntegerByte(b':')));
    assert_eq!(err.partial(), Some(&Value::List(vec![])));

    let err = decode_one(SliceReader::new(b"li1e4:abcdi2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndOfStream);
    assert_eq!(
        err.partial(),
        Some(&Value::List(vec![Value::Integer(1), Value::string("abcd")]))
    );

    let err = decode_one(SliceReader::new(b"-")).unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnknownTypeMarker(b'-')));
}

#[test]
fn test_io_reader() {
    let reader = BufReader::with_capacity(2, Cursor::new(b"d4:listl4:spami42eee".to_vec()));
    let value = decode_reader(reader).unwrap();
    let list = value.get(b"list").and_then(|v| v.as_list()).unwrap();
    assert_eq!(list, &vec![Value::string("spam"), Value::Integer(42)]);
}

#[test]
fn test_io_reader_truncated_string() {
    let err = decode_reader(Cursor::new(b"10:short".to_vec())).unwrap_err();
    assert!(matches!(err.error(), BencodeError::UnexpectedEof));
}

#[test]
fn test_io_reader_from_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"d8:announce15:http://test.come").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let value = decode_reader(BufReader::new(file)).unwrap();
    assert_eq!(
        value.get(b"announce").and_then(|v| v.as_str()),
        Some("http://test.com")
    );
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(12)), b"i12e");
    assert_eq!(encode(&Value::Integer(-42)), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(encode(&Value::string("Hello World!")), b"12:Hello World!");
    assert_eq!(encode(&Value::string("")), b"0:");
}

#[test]
fn test_encode_list() {
    let list = Value::List(vec![Value::Integer(42), Value::string("Hello")]);
    assert_eq!(encode(&list), b"li42e5:Helloe");
}

#[test]
fn test_encode_dict_sorts_keys() {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"question"), Value::string("to be determined"));
    dict.insert(Bytes::from_static(b"answer"), Value::Integer(42));
    assert_eq!(
        encode(&Value::Dict(dict)),
        b"d6:answeri42e8:question16:to be determinede"
    );
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    encode_to(&Value::List(vec![]), &mut out).unwrap();
    assert_eq!(out, b"le");
}

#[test]
fn test_encode_to_reports_writer_errors() {
    let value = Value::List(vec![Value::string("spam"), Value::Integer(42)]);

    let mut small = [0u8; 5];
    let err = encode_to(&value, &mut small[..]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::WriteZero);
    assert_eq!(&small, b"l4:sp");

    let mut file = tempfile::tempfile().unwrap();
    encode_to(&value, &mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(decode_reader(BufReader::new(file)).unwrap(), value);
}

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for a byte-exact roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    assert_eq!(encode(&decoded), original);
}

#[test]
fn test_roundtrip_unsorted_input_keeps_pairs() {
    let decoded = decode(b"d8:question16:to be determined6:answeri42ee").unwrap();
    let reencoded = decode(&encode(&decoded)).unwrap();
    assert_eq!(reencoded, decoded);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());
    assert_eq!(value.kind(), ValueKind::Integer);

    let value = Value::Bytes(Bytes::from_static(b"test"));
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
}

#[test]
fn test_value_try_accessors() {
    let value = Value::List(vec![]);
    let err = value.try_integer().unwrap_err();
    assert!(matches!(
        err,
        BencodeError::TypeMismatch {
            expected: "integer",
            found: "list"
        }
    ));
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    assert!(value.try_list().is_ok());
    assert!(value.try_dict().is_err());

    let invalid = Value::Bytes(Bytes::from_static(&[0xff, 0xfe]));
    assert!(invalid.try_bytes().is_ok());
    assert!(matches!(invalid.try_str(), Err(BencodeError::InvalidUtf8)));
}
