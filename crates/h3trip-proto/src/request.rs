//! Outbound request value handed to the round tripper.
//!
//! Fields are public so that callers and per-connection engines can build
//! and take apart requests freely; the optional parts model a request that
//! has not been fully populated, which [`crate::validate`] rejects.

use std::fmt;

use bytes::Bytes;
use http::Uri;
use tokio::io::AsyncRead;

use crate::header::HeaderField;

/// Method assumed when [`Request::method`] is empty.
pub const DEFAULT_METHOD: &str = "GET";

/// Request body.
///
/// Releasing a body means dropping it: streaming sources free their
/// underlying resource in `Drop`.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Body from bytes.
    Bytes(Bytes),
    /// Streaming body read on demand by the connection.
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl Body {
    /// Wrap a streaming source.
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Body::Stream(Box::new(reader))
    }

    /// Returns true if the body is known to be empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Bytes(b) => b.is_empty(),
            Body::Stream(_) => false,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        if b.is_empty() {
            Body::Empty
        } else {
            Body::Bytes(b)
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::from(Bytes::from(v))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::from(Bytes::from_static(s.as_bytes()))
    }
}

/// An HTTP request addressed to an absolute `https` target.
#[derive(Debug, Default)]
pub struct Request {
    /// Request method. Empty means [`DEFAULT_METHOD`].
    pub method: String,
    /// Target URI. Must carry a scheme and a host.
    pub uri: Option<Uri>,
    /// Optional `Host` override; takes precedence over the URI authority.
    pub host: Option<String>,
    /// Header container.
    pub headers: Option<Vec<HeaderField>>,
    pub body: Option<Body>,
}

impl Request {
    /// Build a request with an empty header container and no body.
    pub fn new(method: impl Into<String>, uri: Uri) -> Self {
        Self {
            method: method.into(),
            uri: Some(uri),
            host: None,
            headers: Some(Vec::new()),
            body: None,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(uri: Uri) -> Self {
        Self::new(DEFAULT_METHOD, uri)
    }

    /// Append a header, creating the container if needed.
    pub fn header(mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push(HeaderField::new(name, value));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the `Host` override.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The method to put on the wire.
    pub fn effective_method(&self) -> &str {
        if self.method.is_empty() {
            DEFAULT_METHOD
        } else {
            &self.method
        }
    }

    /// Release the body, if any. Idempotent.
    pub fn close_body(&mut self) {
        drop(self.body.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_has_empty_header_container() {
        let req = Request::get(Uri::from_static("https://example.test/"));
        assert_eq!(req.headers, Some(Vec::new()));
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_method_defaults_to_get() {
        let mut req = Request::get(Uri::from_static("https://example.test/"));
        req.method.clear();
        assert_eq!(req.effective_method(), "GET");
        req.method = "POST".into();
        assert_eq!(req.effective_method(), "POST");
    }

    #[test]
    fn close_body_is_idempotent() {
        let mut req = Request::get(Uri::from_static("https://example.test/")).body("payload");
        assert!(req.body.is_some());
        req.close_body();
        req.close_body();
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_bytes_become_empty_body() {
        assert!(matches!(Body::from(Vec::new()), Body::Empty));
        assert!(!Body::from("x").is_empty());
    }
}
