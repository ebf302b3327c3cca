//! Signature base string construction.

use crate::encoding::{encode, encode_to};
use crate::error::SyntaxError;
use crate::normalize::normalize_url;
use std::borrow::Cow;

/// Normalizes request parameters into a single string.
///
/// Follows [Section 3.4.1.3.2 of RFC 5849][params]: every name and value
/// is percent-encoded, the pairs are sorted by encoded name with ties
/// broken by encoded value (byte order in both cases), and the result is
/// joined as `name=value` pairs separated by `&`. Duplicate names are
/// kept.
///
/// The caller gathers the decoded pairs from the query string, the form
/// body and the `Authorization` header, and leaves out `oauth_signature`.
///
/// [params]: https://datatracker.ietf.org/doc/html/rfc5849#section-3.4.1.3.2
///
/// # Examples
///
/// ```
/// use oauth_encoding::normalize_parameters;
///
/// let s = normalize_parameters([("a2", "r b"), ("c@", ""), ("a3", "a")]);
/// assert_eq!(s, "a2=r%20b&a3=a&c%40=");
/// ```
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = params
        .into_iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    pairs.sort_unstable();

    let mut buf = String::new();
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            buf.push('&');
        }
        buf.push_str(k);
        buf.push('=');
        buf.push_str(v);
    }
    buf
}

/// Builds a signature base string.
///
/// Follows [Section 3.4.1.1 of RFC 5849][base-string]: the upper-cased
/// request method, the [normalized URL](normalize_url) and the
/// [normalized parameters](normalize_parameters), each percent-encoded
/// and joined by `&`.
///
/// [base-string]: https://datatracker.ietf.org/doc/html/rfc5849#section-3.4.1.1
///
/// # Errors
///
/// Returns `Err` if the URL cannot be parsed.
///
/// # Examples
///
/// ```
/// use oauth_encoding::signature_base;
///
/// let base = signature_base(
///     "get",
///     "HTTP://Example.COM:80/r%20v",
///     [("oauth_nonce", "7d8f3e4a")],
/// )?;
/// assert_eq!(
///     base,
///     "GET&http%3A%2F%2Fexample.com%2Fr%2520v&oauth_nonce%3D7d8f3e4a"
/// );
/// # Ok::<_, oauth_encoding::error::SyntaxError>(())
/// ```
pub fn signature_base<'a, I>(method: &str, url: &str, params: I) -> Result<String, SyntaxError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let url = normalize_url(url)?;
    let params = normalize_parameters(params);

    let mut buf = String::with_capacity(method.len() + url.len() + params.len() + 2);
    buf.push_str(method);
    buf.make_ascii_uppercase();
    buf.push('&');
    encode_to(&url, &mut buf);
    buf.push('&');
    encode_to(&params, &mut buf);
    Ok(buf)
}
