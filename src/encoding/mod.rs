//! Percent-encoding utilities.
//!
//! OAuth 1.0a ([Section 3.6 of RFC 5849][encoding]) mandates a single
//! encode set for everything that enters a signature base string: the
//! unreserved characters of RFC 3986 pass through, and every other byte
//! of the UTF-8 encoded value becomes a `%XX` triplet with uppercase hex
//! digits. Client and server must agree on the exact set for their
//! signatures to match, so [`encode`] never deviates from it.
//!
//! [encoding]: https://datatracker.ietf.org/doc/html/rfc5849#section-3.6

pub mod table;

use crate::error::{err, DecodeError, SyntaxError};
use ref_cast::{ref_cast_custom, RefCastCustom};
use std::{borrow::Cow, cmp::Ordering, fmt, hash, iter::FusedIterator, string::FromUtf8Error};
use table::{Table, HEXDIG, RESERVED, UNRESERVED};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xFF; 256];
    let shift = (hi as u8) * 4;

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

static OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
static OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet.
fn decode_octet(hi: u8, lo: u8) -> Option<u8> {
    let hi = OCTET_TABLE_HI[hi as usize];
    let lo = OCTET_TABLE_LO[lo as usize];
    if hi & 1 == 0 && lo & 0x80 == 0 {
        Some(hi | lo)
    } else {
        None
    }
}

/// Decodes a percent-encoded octet assuming validity.
fn decode_octet_unchecked(hi: u8, lo: u8) -> u8 {
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Percent-encodes a string with the OAuth encode set.
///
/// The input is encoded as UTF-8; bytes outside the [`UNRESERVED`] set
/// are written as `%XX` triplets with uppercase hex digits. The input is
/// borrowed as-is when it needs no encoding.
///
/// # Examples
///
/// ```
/// use oauth_encoding::encode;
///
/// assert_eq!(encode("ab+c~"), "ab%2Bc~");
/// assert_eq!(encode("ferris"), "ferris");
/// ```
#[must_use]
pub fn encode(s: &str) -> Cow<'_, str> {
    // Skip the allowed bytes.
    let i = match s.bytes().position(|x| !UNRESERVED.allows(x)) {
        Some(i) => i,
        None => return Cow::Borrowed(s),
    };

    let mut buf = String::with_capacity(s.len() + 2);
    buf.push_str(&s[..i]);
    for &x in &s.as_bytes()[i..] {
        UNRESERVED.encode(x, &mut buf);
    }
    Cow::Owned(buf)
}

/// Percent-encodes a string with the OAuth encode set, appending the
/// output onto the end of a buffer.
pub fn encode_to(s: &str, buf: &mut String) {
    buf.reserve(s.len());
    for x in s.bytes() {
        UNRESERVED.encode(x, buf);
    }
}

/// Decodes a percent-encoded string.
///
/// Hex digits of either case are accepted. A `+` is copied through
/// literally: OAuth percent-encoding never uses it for a space. The
/// input is borrowed as-is when it contains no percent-encoded octet.
///
/// # Errors
///
/// Returns `Err` if a `%` is not followed by two hex digits, or if the
/// decoded bytes are not valid UTF-8.
///
/// # Examples
///
/// ```
/// use oauth_encoding::decode;
///
/// assert_eq!(decode("ab%2Bc~")?, "ab+c~");
/// assert!(decode("ab%2").is_err());
/// # Ok::<_, oauth_encoding::error::DecodeError>(())
/// ```
pub fn decode(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    // Skip bytes that are not '%'.
    let i = match s.bytes().position(|x| x == b'%') {
        Some(i) => i,
        None => return Ok(Cow::Borrowed(s)),
    };

    let bytes = s.as_bytes();
    let mut buf = Vec::with_capacity(bytes.len());
    buf.extend_from_slice(&bytes[..i]);
    decode_from(bytes, i, &mut buf)?;

    String::from_utf8(buf)
        .map(Cow::Owned)
        .map_err(DecodeError::Utf8)
}

fn decode_from(s: &[u8], mut i: usize, buf: &mut Vec<u8>) -> Result<(), SyntaxError> {
    while i < s.len() {
        let x = s[i];
        if x == b'%' {
            if i + 2 >= s.len() {
                err!(i, InvalidOctet);
            }
            let octet = match decode_octet(s[i + 1], s[i + 2]) {
                Some(octet) => octet,
                None => err!(i, InvalidOctet),
            };
            buf.push(octet);
            i += 3;
        } else {
            buf.push(x);
            i += 1;
        }
    }
    Ok(())
}

/// Validates a string with a table.
///
/// If the table allows percent-encoded octets, each `%` must be followed
/// by two hex digits.
///
/// # Errors
///
/// Returns `Err` with the index and cause of the first offending byte.
///
/// # Examples
///
/// ```
/// use oauth_encoding::encoding::{table, validate};
///
/// assert!(validate("photos.example.net", table::REG_NAME).is_ok());
/// assert!(validate("photos_example.net", table::REG_NAME).is_ok());
/// assert_eq!(validate("photos example", table::REG_NAME).unwrap_err().index(), 6);
/// ```
pub fn validate(s: &str, table: &Table) -> Result<(), SyntaxError> {
    let s = s.as_bytes();
    let mut i = 0;
    while i < s.len() {
        let x = s[i];
        if x == b'%' && table.allows_enc() {
            if i + 2 >= s.len() {
                err!(i, InvalidOctet);
            }
            if HEXDIG.get(s[i + 1]) & HEXDIG.get(s[i + 2]) == 0 {
                err!(i, InvalidOctet);
            }
            i += 3;
        } else {
            if !table.allows(x) {
                err!(i, UnexpectedChar);
            }
            i += 1;
        }
    }
    Ok(())
}

const fn validate_estr(s: &[u8]) -> bool {
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            if i + 2 >= s.len() {
                return false;
            }
            if HEXDIG.get(s[i + 1]) & HEXDIG.get(s[i + 2]) == 0 {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Percent-encoded string slices.
///
/// The underlying byte sequence of an `EStr` can be formed by joining any
/// number of unencoded characters and `%XX` triplets with hex digits of
/// either case. Splitting at a reserved character therefore never tears a
/// triplet apart.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Decoding is **not** performed prior to comparison.
///
/// # Examples
///
/// Parse key-value pairs from an OAuth parameter string into a hash map:
///
/// ```
/// use oauth_encoding::encoding::EStr;
/// use std::collections::HashMap;
///
/// let s = "name=%E5%BC%A0%E4%B8%89&speech=%C2%A1Ol%C3%A9%21";
/// let map: HashMap<_, _> = EStr::new_or_panic(s)
///     .split('&')
///     .filter_map(|s| s.split_once('='))
///     .map(|(k, v)| (k.decode(), v.decode()))
///     .filter_map(|(k, v)| k.into_string().ok().zip(v.into_string().ok()))
///     .collect();
/// assert_eq!(map["name"], "张三");
/// assert_eq!(map["speech"], "¡Olé!");
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr {
    inner: str,
}

impl EStr {
    /// Converts a string slice to an `EStr` assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr`.
    pub const EMPTY: &'static EStr = EStr::new_validated("");

    /// Converts a string slice to an `EStr`, returning `None` if the
    /// conversion fails.
    #[must_use]
    pub const fn new(s: &str) -> Option<&EStr> {
        if validate_estr(s.as_bytes()) {
            Some(EStr::new_validated(s))
        } else {
            None
        }
    }

    /// Converts a string slice to an `EStr`.
    ///
    /// # Panics
    ///
    /// Panics if the string is not properly encoded.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &EStr {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Decodes the `EStr`.
    ///
    /// This method allocates only when the slice contains any
    /// percent-encoded octet.
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth_encoding::encoding::EStr;
    ///
    /// let dec = EStr::new_or_panic("%C2%BF").decode();
    /// assert_eq!(dec.as_bytes(), &[0xc2, 0xbf]);
    /// assert_eq!(dec.into_string()?, "¿");
    /// # Ok::<_, std::string::FromUtf8Error>(())
    /// ```
    #[must_use]
    pub fn decode(&self) -> Decode<'_> {
        let bytes = self.inner.as_bytes();
        let mut i = match bytes.iter().position(|&x| x == b'%') {
            Some(i) => i,
            None => {
                return Decode {
                    src: &self.inner,
                    decoded: None,
                }
            }
        };

        let mut buf = Vec::with_capacity(bytes.len());
        buf.extend_from_slice(&bytes[..i]);

        while i < bytes.len() {
            let x = bytes[i];
            if x == b'%' {
                // Triplets were validated on construction.
                buf.push(decode_octet_unchecked(bytes[i + 1], bytes[i + 2]));
                i += 3;
            } else {
                buf.push(x);
                i += 1;
            }
        }

        Decode {
            src: &self.inner,
            decoded: Some(buf),
        }
    }

    /// Returns an iterator over subslices separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth_encoding::encoding::EStr;
    ///
    /// let s = EStr::new_or_panic("oauth_token=abc&realm=%22photos%22");
    /// assert!(s.split('&').eq(["oauth_token=abc", "realm=%22photos%22"]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_> {
        assert!(
            delim.is_ascii() && RESERVED.allows(delim as u8),
            "splitting with non-reserved character"
        );

        Split {
            s: &self.inner,
            delim: delim as u8,
            finished: false,
        }
    }

    /// Splits the `EStr` on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth_encoding::encoding::EStr;
    ///
    /// let (k, v) = EStr::new_or_panic("key=value").split_once('=').unwrap();
    /// assert_eq!(k, "key");
    /// assert_eq!(v, "value");
    ///
    /// assert!(EStr::new_or_panic("abc").split_once(';').is_none());
    /// ```
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&EStr, &EStr)> {
        assert!(
            delim.is_ascii() && RESERVED.allows(delim as u8),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }

    /// Splits the `EStr` on the last occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn rsplit_once(&self, delim: char) -> Option<(&EStr, &EStr)> {
        assert!(
            delim.is_ascii() && RESERVED.allows(delim as u8),
            "splitting with non-reserved character"
        );
        self.inner
            .rsplit_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }
}

impl AsRef<Self> for EStr {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsRef<str> for EStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for EStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for EStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<EStr> for str {
    fn eq(&self, other: &EStr) -> bool {
        self == &other.inner
    }
}

impl Eq for EStr {}

impl hash::Hash for EStr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for EStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &EStr {
    /// Creates an empty `EStr`.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl fmt::Debug for EStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(feature = "serde")]
impl Serialize for EStr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de: 'a, 'a> Deserialize<'de> for &'a EStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        EStr::new(s).ok_or_else(|| de::Error::custom("improperly encoded string"))
    }
}

/// A wrapper of percent-decoded bytes.
///
/// This struct is created by calling [`decode`] on an `EStr`.
///
/// [`decode`]: EStr::decode
#[derive(Clone, Debug)]
pub struct Decode<'a> {
    src: &'a str,
    decoded: Option<Vec<u8>>,
}

impl<'a> Decode<'a> {
    /// Returns a reference to the decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.decoded {
            Some(vec) => vec,
            None => self.src.as_bytes(),
        }
    }

    /// Yields the underlying decoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Cow<'a, [u8]> {
        match self.decoded {
            Some(vec) => Cow::Owned(vec),
            None => Cow::Borrowed(self.src.as_bytes()),
        }
    }

    /// Returns `true` if anything is decoded.
    #[must_use]
    pub fn decoded_any(&self) -> bool {
        self.decoded.is_some()
    }

    /// Converts the decoded bytes to a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    pub fn into_string(self) -> Result<Cow<'a, str>, FromUtf8Error> {
        match self.decoded {
            Some(vec) => String::from_utf8(vec).map(Cow::Owned),
            None => Ok(Cow::Borrowed(self.src)),
        }
    }

    /// Converts the decoded bytes to a string, replacing any invalid UTF-8
    /// sequences with [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn into_string_lossy(self) -> Cow<'a, str> {
        match self.decoded {
            Some(vec) => Cow::Owned(
                String::from_utf8(vec)
                    .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into_owned()),
            ),
            None => Cow::Borrowed(self.src),
        }
    }
}

/// An iterator over subslices of an [`EStr`] separated by a delimiter.
///
/// This struct is created by calling [`split`] on an `EStr`.
///
/// [`split`]: EStr::split
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a> {
    s: &'a str,
    delim: u8,
    finished: bool,
}

impl<'a> Iterator for Split<'a> {
    type Item = &'a EStr;

    fn next(&mut self) -> Option<&'a EStr> {
        if self.finished {
            return None;
        }

        let head = match self.s.bytes().position(|x| x == self.delim) {
            Some(i) => {
                let head = &self.s[..i];
                self.s = &self.s[i + 1..];
                head
            }
            None => {
                self.finished = true;
                self.s
            }
        };
        Some(EStr::new_validated(head))
    }
}

impl<'a> DoubleEndedIterator for Split<'a> {
    fn next_back(&mut self) -> Option<&'a EStr> {
        if self.finished {
            return None;
        }

        let tail = match self.s.bytes().rposition(|x| x == self.delim) {
            Some(i) => {
                let tail = &self.s[i + 1..];
                self.s = &self.s[..i];
                tail
            }
            None => {
                self.finished = true;
                self.s
            }
        };
        Some(EStr::new_validated(tail))
    }
}

impl FusedIterator for Split<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_table() {
        assert_eq!(decode_octet(b'2', b'B'), Some(0x2B));
        assert_eq!(decode_octet(b'2', b'b'), Some(0x2B));
        assert_eq!(decode_octet(b'G', b'0'), None);
        assert_eq!(decode_octet(b'0', b'g'), None);
    }

    #[test]
    fn estr_validation() {
        assert!(EStr::new("a%20b").is_some());
        assert!(EStr::new("%e4%Bd%a0").is_some());
        assert!(EStr::new("%").is_none());
        assert!(EStr::new("%2").is_none());
        assert!(EStr::new("%xy").is_none());
    }
}
