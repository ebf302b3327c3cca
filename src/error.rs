//! Error types.

use std::{fmt, string::FromUtf8Error};

/// Detailed cause of a [`SyntaxError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character "%" of the octet.
    InvalidOctet,
    /// Unexpected character that is not allowed by the syntax.
    ///
    /// The error index points to the character.
    UnexpectedChar,
    /// Invalid IP literal.
    ///
    /// The error index points to the preceding left square bracket "[".
    InvalidIpLiteral,
    /// Missing scheme component.
    ///
    /// The error index points to where the ":" delimiter was expected.
    MissingScheme,
    /// Missing the "//" that precedes the authority component.
    ///
    /// The error index points to where the "//" was expected.
    MissingAuthority,
    /// Missing host subcomponent.
    ///
    /// The error index points to where the host was expected.
    MissingHost,
}

/// A syntax error occurred when parsing, decoding or validating strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub(crate) index: usize,
    pub(crate) kind: SyntaxErrorKind,
}

impl SyntaxError {
    /// Returns the index where the error occurred in the input string.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[inline]
    pub fn kind(self) -> SyntaxErrorKind {
        self.kind
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            SyntaxErrorKind::InvalidOctet => "invalid percent-encoded octet at index ",
            SyntaxErrorKind::UnexpectedChar => "unexpected character at index ",
            SyntaxErrorKind::InvalidIpLiteral => "invalid IP literal at index ",
            SyntaxErrorKind::MissingScheme => "missing scheme at index ",
            SyntaxErrorKind::MissingAuthority => "missing authority at index ",
            SyntaxErrorKind::MissingHost => "missing host at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

impl std::error::Error for SyntaxError {}

/// An error occurred when decoding a percent-encoded string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The string is not properly encoded.
    Syntax(SyntaxError),
    /// The decoded bytes are not valid UTF-8.
    Utf8(FromUtf8Error),
}

impl From<SyntaxError> for DecodeError {
    fn from(e: SyntaxError) -> Self {
        DecodeError::Syntax(e)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Syntax(e) => fmt::Display::fmt(e, f),
            DecodeError::Utf8(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Syntax(e) => Some(e),
            DecodeError::Utf8(e) => Some(e),
        }
    }
}

/// Returns immediately with a syntax error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(crate::error::SyntaxError {
            index: $index,
            kind: crate::error::SyntaxErrorKind::$kind,
        }
        .into())
    };
}

pub(crate) use err;
