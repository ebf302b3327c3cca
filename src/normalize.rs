//! Base string URL normalization.

use crate::encoding::{table, validate};
use crate::error::{err, SyntaxError};

/// Normalizes a URL into the form used in a signature base string.
///
/// Follows [Section 3.4.1.2 of RFC 5849][base-string-uri]: the scheme and
/// host are lower-cased, the port is dropped when it equals the scheme's
/// default (80 for `http`, 443 for `https`), the query and fragment are
/// dropped, and an empty path becomes `/`. Any other path is preserved
/// exactly, with no re-encoding. Userinfo never appears in a base string
/// URL and is dropped as well.
///
/// [base-string-uri]: https://datatracker.ietf.org/doc/html/rfc5849#section-3.4.1.2
///
/// # Errors
///
/// Returns `Err` if the input cannot be parsed into scheme, host and
/// path components.
///
/// # Examples
///
/// ```
/// use oauth_encoding::normalize_url;
///
/// assert_eq!(normalize_url("HTTP://Example.COM:80")?, "http://example.com/");
/// assert_eq!(
///     normalize_url("https://example.com/r%20v/X?id=123")?,
///     "https://example.com/r%20v/X"
/// );
/// # Ok::<_, oauth_encoding::error::SyntaxError>(())
/// ```
pub fn normalize_url(url: &str) -> Result<String, SyntaxError> {
    let parts = Parser { s: url, pos: 0 }.parse()?;

    let mut buf = String::with_capacity(url.len());

    buf.push_str(parts.scheme);
    buf.make_ascii_lowercase();
    let scheme_end = buf.len();

    buf.push_str("://");
    let host_start = buf.len();
    buf.push_str(parts.host);
    buf[host_start..].make_ascii_lowercase();

    if let Some(port) = parts.port {
        let mut eq_default = false;
        if let Some(default) = default_port(&buf[..scheme_end]) {
            eq_default = port.parse().ok() == Some(default);
        }
        if !eq_default {
            buf.push(':');
            buf.push_str(port);
        }
    }

    if parts.path.is_empty() {
        buf.push('/');
    } else {
        buf.push_str(parts.path);
    }
    Ok(buf)
}

/// Returns the default port of a scheme, if any.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

struct UrlParts<'a> {
    scheme: &'a str,
    host: &'a str,
    /// `None` when absent or empty.
    port: Option<&'a str>,
    path: &'a str,
}

struct Parser<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn bytes(&self) -> &'a [u8] {
        self.s.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Advances over bytes allowed by the table.
    fn scan(&mut self, table: &table::Table) {
        while let Some(x) = self.peek() {
            if !table.allows(x) {
                break;
            }
            self.pos += 1;
        }
    }

    fn parse(mut self) -> Result<UrlParts<'a>, SyntaxError> {
        let scheme = self.parse_scheme()?;

        if !self.s[self.pos..].starts_with("//") {
            err!(self.pos, MissingAuthority);
        }
        self.pos += 2;

        let (host, port) = self.parse_authority()?;

        // The path runs up to the start of the query or fragment.
        let path_start = self.pos;
        let path_end = self.s[path_start..]
            .bytes()
            .position(|x| matches!(x, b'?' | b'#'))
            .map_or(self.s.len(), |i| path_start + i);

        Ok(UrlParts {
            scheme,
            host,
            port,
            path: &self.s[path_start..path_end],
        })
    }

    fn parse_scheme(&mut self) -> Result<&'a str, SyntaxError> {
        match self.peek() {
            Some(x) if x.is_ascii_alphabetic() => {}
            _ => err!(0, UnexpectedChar),
        }
        self.scan(table::SCHEME);
        if self.peek() != Some(b':') {
            err!(self.pos, MissingScheme);
        }

        let scheme = &self.s[..self.pos];
        self.pos += 1;
        Ok(scheme)
    }

    fn parse_authority(&mut self) -> Result<(&'a str, Option<&'a str>), SyntaxError> {
        let start = self.pos;
        let end = self.s[start..]
            .bytes()
            .position(|x| matches!(x, b'/' | b'?' | b'#'))
            .map_or(self.s.len(), |i| start + i);

        // Userinfo is dropped from the output.
        let host_start = match self.s[start..end].bytes().position(|x| x == b'@') {
            Some(i) => start + i + 1,
            None => start,
        };

        let (host_end, port_start) = if self.bytes().get(host_start) == Some(&b'[') {
            let close = match self.s[host_start..end].bytes().position(|x| x == b']') {
                Some(i) => host_start + i,
                None => err!(host_start, InvalidIpLiteral),
            };
            let host_end = close + 1;
            if host_end < end && self.bytes()[host_end] != b':' {
                err!(host_end, UnexpectedChar);
            }
            (host_end, (host_end < end).then_some(host_end + 1))
        } else {
            match self.s[host_start..end].bytes().position(|x| x == b':') {
                Some(i) => (host_start + i, Some(host_start + i + 1)),
                None => (end, None),
            }
        };

        let host = &self.s[host_start..host_end];
        if host.is_empty() {
            err!(host_start, MissingHost);
        }
        if !host.starts_with('[') {
            // Registered name or IPv4 address; the contents of an IP
            // literal are left to the resolver.
            validate(host, table::REG_NAME).map_err(|e| SyntaxError {
                index: host_start + e.index,
                kind: e.kind,
            })?;
        }

        let port = match port_start {
            Some(port_start) => {
                let port = &self.s[port_start..end];
                if let Some(i) = port.bytes().position(|x| !table::DIGIT.allows(x)) {
                    err!(port_start + i, UnexpectedChar);
                }
                (!port.is_empty()).then_some(port)
            }
            None => None,
        };

        self.pos = end;
        Ok((host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts() {
        let parser = Parser {
            s: "http://user@h.EXAMPLE:8080/p/q?x=1#y",
            pos: 0,
        };
        let parts = parser.parse().unwrap();
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.host, "h.EXAMPLE");
        assert_eq!(parts.port, Some("8080"));
        assert_eq!(parts.path, "/p/q");
    }

    #[test]
    fn default_ports() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("wss"), None);
    }
}
