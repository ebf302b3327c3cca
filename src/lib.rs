#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! String canonicalization for OAuth 1.0a request signing, strictly
//! following IETF [RFC 5849].
//!
//! [RFC 5849]: https://datatracker.ietf.org/doc/html/rfc5849/
//!
//! Three operations cover everything a signer needs to agree on with a
//! service provider before any cryptography happens:
//!
//! - [`encode`] percent-encodes a value with the OAuth encode set,
//!   which is stricter than that of most general-purpose URL encoders.
//! - [`decode`] is the inverse operation.
//! - [`normalize_url`] canonicalizes a URL into the form that enters
//!   the signature base string.
//!
//! On top of the triad, [`normalize_parameters`] and [`signature_base`]
//! assemble the canonicalized pieces into a signature base string.
//! Signing the base string, generating nonces and timestamps, and
//! sending the request are left to the surrounding pipeline; this crate
//! performs no I/O and keeps no state.
//!
//! # Feature flags
//!
//! - `serde`: Enables `serde` support for [`EStr`](encoding::EStr).
//!
//! # Examples
//!
//! ```
//! use oauth_encoding::{decode, encode, normalize_url};
//!
//! assert_eq!(encode("ab+c~"), "ab%2Bc~");
//! assert_eq!(decode("ab%2Bc~")?, "ab+c~");
//! assert_eq!(
//!     normalize_url("HTTP://Example.COM:80/albums?page=3")?,
//!     "http://example.com/albums"
//! );
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

pub mod encoding;
pub mod error;

mod base;
mod normalize;

pub use base::{normalize_parameters, signature_base};
pub use encoding::{decode, encode};
pub use normalize::normalize_url;
