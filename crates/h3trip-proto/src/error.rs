//! Error types for request validation and SETTINGS handling.
//!
//! Every variant except [`ProtoError::ReservedSetting`] describes a
//! malformed request, rejected before any connection is touched.

use thiserror::Error;

/// Errors that can occur within the `h3trip-proto` crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    // --- Request target ---
    #[error("request has no URL")]
    MissingUrl,

    #[error("no host in request URL")]
    MissingHost,

    #[error("request has no header container")]
    MissingHeaders,

    #[error("unsupported protocol scheme: {0:?}")]
    UnsupportedScheme(String),

    #[error("invalid authority: {0:?}")]
    InvalidAuthority(String),

    // --- Fields ---
    #[error("invalid header field name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid header field value {value:?} for key {name}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    // --- SETTINGS ---
    #[error("setting 0x{0:x} is reserved by HTTP/3 and cannot be overridden")]
    ReservedSetting(u64),

    #[error("setting 0x{id:x} value {value} exceeds the varint range")]
    SettingOutOfRange { id: u64, value: u64 },
}

impl ProtoError {
    /// Returns true for the errors that describe a malformed request.
    pub fn is_malformed_request(&self) -> bool {
        !matches!(
            self,
            Self::ReservedSetting(_) | Self::SettingOutOfRange { .. }
        )
    }
}

/// Result type alias using [`ProtoError`].
pub type Result<T> = std::result::Result<T, ProtoError>;
