//! Response value handed back by a per-connection engine.
//!
//! The round tripper never inspects it; it is returned to the caller
//! unchanged.

use bytes::Bytes;

use crate::header::HeaderField;

/// HTTP response produced by a per-connection engine.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<HeaderField>,
    body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: Vec<HeaderField>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code (e.g. 200, 404).
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[HeaderField] {
        &self.headers
    }

    /// Get the first header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|h| h.is_named(name))
            .map(|h| h.value.as_slice())
    }

    /// Reference to the body bytes without consuming.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response and return the body bytes.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}
