//! Connection cache keys.
//!
//! An [`Authority`] names one remote endpoint. Two requests for the same
//! host and the same effective port always produce equal authorities, so
//! they share one cached connection.

use std::fmt;
use std::net::Ipv6Addr;

use crate::error::{ProtoError, Result};
use crate::request::Request;

/// The only scheme the transport serves.
pub const SCHEME_HTTPS: &str = "https";

/// Port assumed when an `https` target names none.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Canonical `host:port` of an `https` endpoint.
///
/// Hosts are stored lowercased and without IPv6 brackets; [`fmt::Display`]
/// adds the brackets back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Authority {
    host: String,
    port: u16,
}

impl Authority {
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        let host = host.as_ref();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        Self {
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`. A missing or empty
    /// port means 443. A bare IPv6 literal without brackets is accepted as a
    /// host; any other input with more than one colon is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ProtoError::InvalidAuthority(s.to_string());

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, after) = rest.split_once(']').ok_or_else(invalid)?;
            if host.parse::<Ipv6Addr>().is_err() {
                return Err(invalid());
            }
            match after {
                "" => (host, None),
                _ => (host, Some(after.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match s.split_once(':') {
                None => (valid_reg_name(s).ok_or_else(invalid)?, None),
                Some((host, port)) if !port.contains(':') => {
                    (valid_reg_name(host).ok_or_else(invalid)?, Some(port))
                }
                Some(_) => {
                    s.parse::<Ipv6Addr>().map_err(|_| invalid())?;
                    (s, None)
                }
            }
        };

        let port = match port {
            None | Some("") => DEFAULT_HTTPS_PORT,
            Some(p) => p.parse::<u16>().map_err(|_| invalid())?,
        };

        Ok(Self::new(host, port))
    }

    /// Derive the authority a request addresses.
    ///
    /// Uses the `Host` override when set, else the URI authority. Total: a
    /// request without any host yields an empty host, and an unparseable
    /// override falls back to the URI (validation rejects both cases before
    /// dispatch).
    pub fn for_request(req: &Request) -> Self {
        if let Some(host) = req.host.as_deref().filter(|h| !h.is_empty()) {
            if let Ok(authority) = Self::parse(host) {
                return authority;
            }
        }
        match req.uri.as_ref() {
            Some(uri) => Self::new(
                uri.host().unwrap_or_default(),
                uri.port_u16().unwrap_or(DEFAULT_HTTPS_PORT),
            ),
            None => Self::new("", DEFAULT_HTTPS_PORT),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns true if the host is an IPv6 literal.
    pub fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }
}

// Registered name or IPv4 literal; IPv6 literals are checked separately.
fn valid_reg_name(host: &str) -> Option<&str> {
    let valid = !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'%' | b'~'));
    valid.then_some(host)
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl std::str::FromStr for Authority {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use super::*;

    fn resolve(uri: &'static str) -> String {
        Authority::for_request(&Request::get(Uri::from_static(uri))).to_string()
    }

    #[test]
    fn default_port_is_filled_in() {
        assert_eq!(resolve("https://example.test/a"), "example.test:443");
        assert_eq!(resolve("https://example.test:443/b"), "example.test:443");
    }

    #[test]
    fn same_endpoint_same_key() {
        let a = Authority::for_request(&Request::get(Uri::from_static("https://Example.TEST/x")));
        let b = Authority::for_request(&Request::get(Uri::from_static(
            "https://example.test:443/y?z=1",
        )));
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_port_distinguishes_endpoints() {
        assert_eq!(resolve("https://example.test:8443/"), "example.test:8443");
        assert_ne!(resolve("https://example.test:8443/"), resolve("https://example.test/"));
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(resolve("https://[::1]/"), "[::1]:443");
        assert_eq!(resolve("https://[::1]:4433/"), "[::1]:4433");
    }

    #[test]
    fn host_override_wins() {
        let req = Request::get(Uri::from_static("https://10.0.0.1/")).with_host("api.example.test");
        assert_eq!(Authority::for_request(&req).to_string(), "api.example.test:443");
    }

    #[test]
    fn parse_forms() {
        assert_eq!(Authority::parse("example.test").unwrap(), Authority::new("example.test", 443));
        assert_eq!(Authority::parse("example.test:").unwrap(), Authority::new("example.test", 443));
        assert_eq!(Authority::parse("example.test:8443").unwrap().port(), 8443);
        assert_eq!(Authority::parse("[::1]").unwrap().to_string(), "[::1]:443");
        assert_eq!(Authority::parse("[::1]:9000").unwrap().to_string(), "[::1]:9000");
        assert_eq!(Authority::parse("::1").unwrap().to_string(), "[::1]:443");
        assert_eq!(
            Authority::parse("2001:DB8::1").unwrap().to_string(),
            "[2001:db8::1]:443"
        );
        assert_eq!(Authority::parse("10.0.0.1:8443").unwrap().port(), 8443);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Authority::parse("").is_err());
        assert!(Authority::parse(":443").is_err());
        assert!(Authority::parse("host:port").is_err());
        assert!(Authority::parse("host:70000").is_err());
        assert!(Authority::parse("[::1").is_err());
        assert!(Authority::parse("[::1]x").is_err());
        assert!(Authority::parse("bad host").is_err());
        assert!(Authority::parse("example.test:443:1").is_err());
        assert!(Authority::parse("a:b:c").is_err());
        assert!(Authority::parse("[example.test]:443").is_err());
        assert!(Authority::parse("[]").is_err());
    }
}
