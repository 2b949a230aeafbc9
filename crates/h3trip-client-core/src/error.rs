//! Error types for the client transport layer.

use std::sync::Arc;
use std::time::Duration;

use h3trip_proto::{Authority, ProtoError};
use thiserror::Error;

/// Errors that can occur in the client transport.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ProtoError),

    #[error("invalid transport settings: {0}")]
    Settings(#[source] ProtoError),

    #[error("no cached connection was available")]
    NoCachedConn,

    /// Sticky dial failure, shared by every caller of the same handle.
    #[error("dial failed: {0}")]
    Dial(#[source] Arc<ClientError>),

    #[error("dial timed out after {0:?}")]
    DialTimeout(Duration),

    #[error("dial task ended without an outcome")]
    DialAborted,

    #[error("endpoint creation failed: {0}")]
    Endpoint(String),

    #[error("could not resolve {authority}: {reason}")]
    Resolve { authority: Authority, reason: String },

    #[error("connection failed: {0}")]
    Connection(#[from] quinn::ConnectionError),

    #[error("connect error: {0}")]
    Connect(#[from] quinn::ConnectError),

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    #[error("round trip failed: {0}")]
    RoundTrip(String),

    #[error("stream I/O error: {0}")]
    StreamIo(String),

    #[error("failed to close {} connection(s)", .0.len())]
    Close(Vec<(Authority, ClientError)>),
}

impl ClientError {
    /// Returns true if the error is [`ClientError::NoCachedConn`].
    pub fn is_no_cached_conn(&self) -> bool {
        matches!(self, Self::NoCachedConn)
    }

    /// Returns true if the request was rejected before any connection work.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::InvalidRequest(e) if e.is_malformed_request())
    }

    /// Returns true if the error is a (possibly cached) dial failure.
    pub fn is_dial_failure(&self) -> bool {
        matches!(self, Self::Dial(_) | Self::DialTimeout(_) | Self::DialAborted)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
