use oauth_encoding::{
    decode, encode,
    encoding::{encode_to, table, validate, EStr},
    error::{DecodeError, SyntaxErrorKind},
};
use std::borrow::Cow;

const RAW: &str = "te😃a 测1`~!@试#$%st^&+=";
const ENCODED: &str = "te%F0%9F%98%83a%20%E6%B5%8B1%60~%21%40%E8%AF%95%23%24%25st%5E%26%2B%3D";

#[test]
fn enc_dec_validate() {
    let s = encode(RAW);
    assert_eq!(s, ENCODED);

    let mut buf = String::from("x=");
    encode_to(RAW, &mut buf);
    assert_eq!(&buf[2..], ENCODED);

    assert!(validate(&s, &table::UNRESERVED.enc()).is_ok());

    assert_eq!(decode(ENCODED).unwrap(), RAW);

    // Nothing to do, nothing allocated.
    assert!(matches!(encode("abc-_.~"), Cow::Borrowed(_)));
    assert!(matches!(decode("abc").unwrap(), Cow::Borrowed(_)));

    // Lowercase hex is accepted on the way in.
    assert_eq!(decode("ab%2bc~").unwrap(), "ab+c~");
}

#[test]
fn oauth_encode_set() {
    assert_eq!(encode("ab+c~"), "ab%2Bc~");
    assert_eq!(decode("ab%2Bc~").unwrap(), "ab+c~");

    // Characters that generic URL encoders leave alone must be escaped.
    assert_eq!(encode("+!*'()"), "%2B%21%2A%27%28%29");
    assert_eq!(encode(" "), "%20");
    assert_eq!(encode("日"), "%E6%97%A5");
}

#[test]
fn unreserved_invariant() {
    let all: String = (0u8..=127).map(char::from).collect();
    let s = encode(&all);

    let mut bytes = s.bytes();
    while let Some(x) = bytes.next() {
        if x == b'%' {
            let hi = bytes.next().unwrap();
            let lo = bytes.next().unwrap();
            assert!(matches!(hi, b'0'..=b'9' | b'A'..=b'F'));
            assert!(matches!(lo, b'0'..=b'9' | b'A'..=b'F'));
        } else {
            assert!(x.is_ascii_alphanumeric() || matches!(x, b'-' | b'.' | b'_' | b'~'));
        }
    }
}

#[test]
fn round_trip() {
    for s in [RAW, "", "hello world", "naïve café ☕", "100% legit"] {
        assert_eq!(decode(&encode(s)).unwrap(), s);
    }
}

#[test]
fn malformed_escapes() {
    for (s, index) in [("ab%", 2), ("ab%2", 2), ("%zz", 0), ("a%0g", 1), ("%%20", 0)] {
        match decode(s) {
            Err(DecodeError::Syntax(e)) => {
                assert_eq!(e.index(), index, "index for {s:?}");
                assert_eq!(e.kind(), SyntaxErrorKind::InvalidOctet);
            }
            other => panic!("expected syntax error for {s:?}, got {other:?}"),
        }
    }
}

#[test]
fn invalid_utf8() {
    assert!(matches!(decode("%FF"), Err(DecodeError::Utf8(_))));

    // A multi-byte sequence cut short is caught on the decoded bytes.
    assert!(matches!(decode("%E6%B5"), Err(DecodeError::Utf8(_))));
}

#[test]
fn estr_split_decode() {
    let s = EStr::new_or_panic("oauth_token=abc&name=%E5%BC%A0%E4%B8%89");
    let mut split = s.split('&');

    let it = split.next().unwrap();
    assert_eq!(it, "oauth_token=abc");
    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k, "oauth_token");
    assert!(!v.decode().decoded_any());
    assert_eq!(v.decode().into_string().unwrap(), "abc");

    let it = split.next().unwrap();
    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k.decode().into_string().unwrap(), "name");
    assert!(v.decode().decoded_any());
    assert_eq!(v.decode().into_string().unwrap(), "张三");

    assert!(split.next().is_none());
}

#[test]
fn estr_misc() {
    assert!(EStr::new("a%2").is_none());
    assert!(EStr::new("a%2xb").is_none());

    let s = EStr::new_or_panic("a=1&b=2&c=3");
    assert!(s.split('&').rev().eq(["c=3", "b=2", "a=1"]));

    let (rest, last) = s.rsplit_once('&').unwrap();
    assert_eq!(rest, "a=1&b=2");
    assert_eq!(last, "c=3");

    assert_eq!(EStr::EMPTY.len(), 0);
    assert!(EStr::new_or_panic("").is_empty());
    assert!(EStr::EMPTY.split('&').eq([""]));

    // Decoded bytes that are not UTF-8 surface on conversion only.
    let dec = EStr::new_or_panic("%FFa").decode();
    assert_eq!(dec.as_bytes(), &[0xFF, b'a']);
    assert_eq!(dec.clone().into_string_lossy(), "\u{FFFD}a");
    assert!(dec.into_string().is_err());
}

#[test]
fn validate_tables() {
    assert!(validate("example.com", table::REG_NAME).is_ok());
    assert!(validate("ex%41mple.com", table::REG_NAME).is_ok());

    let e = validate("ex ample", table::REG_NAME).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), SyntaxErrorKind::UnexpectedChar);

    let e = validate("ex%4", table::REG_NAME).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), SyntaxErrorKind::InvalidOctet);

    // A table without pct-encoded octets treats '%' as any other
    // disallowed character.
    let e = validate("a%62c", table::UNRESERVED).unwrap_err();
    assert_eq!(e.index(), 1);
    assert_eq!(e.kind(), SyntaxErrorKind::UnexpectedChar);
}
