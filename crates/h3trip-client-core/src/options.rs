//! Transport configuration captured when a [`RoundTripper`] is built.
//!
//! [`TransportOptions`] is frozen into an `Arc` by the round tripper and the
//! same snapshot is handed to every connection it creates.
//!
//! [`RoundTripper`]: crate::RoundTripper

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use h3trip_proto::frame::{FrameType, StreamType};
use h3trip_proto::settings::{self, Settings};

use crate::endpoint::{Dialer, QuinnDialer};
use crate::error::{ClientError, Result};

/// Outcome of offering a bidirectional stream to a [`StreamHijacker`].
pub enum BidiHijack {
    /// The callback took ownership of the stream.
    Taken,
    /// Control returns to HTTP/3.
    Declined(quinn::SendStream, quinn::RecvStream),
}

/// Outcome of offering a unidirectional stream to a [`UniStreamHijacker`].
pub enum UniHijack {
    Taken,
    Declined(quinn::RecvStream),
}

/// Called for the first unknown frame on a bidirectional stream, right after
/// its type was parsed. A failed type parse is passed as `Err`.
pub type StreamHijacker = Arc<
    dyn Fn(
            std::result::Result<FrameType, ClientError>,
            &quinn::Connection,
            quinn::SendStream,
            quinn::RecvStream,
        ) -> Result<BidiHijack>
        + Send
        + Sync,
>;

/// Called for a unidirectional stream of unknown type.
pub type UniStreamHijacker = Arc<
    dyn Fn(
            std::result::Result<StreamType, ClientError>,
            &quinn::Connection,
            quinn::RecvStream,
        ) -> UniHijack
        + Send
        + Sync,
>;

/// Receives one line per dispatched request.
pub type DebugSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Configuration shared by every connection of one round tripper.
#[derive(Clone, Default)]
pub struct TransportOptions {
    /// TLS client configuration. Required by the default dialer.
    pub tls: Option<Arc<rustls::ClientConfig>>,
    /// QUIC transport parameters. `None` uses quinn's defaults.
    pub quic: Option<Arc<quinn::TransportConfig>>,
    /// Advertise HTTP/3 datagram support (RFC 9297).
    pub enable_datagrams: bool,
    /// Extension SETTINGS. Reserved identifiers are rejected at build time.
    pub additional_settings: BTreeMap<u64, u64>,
    /// Upper bound on a response header section, in bytes.
    pub max_response_header_bytes: Option<u64>,
    /// Do not request compressed responses.
    pub disable_compression: bool,
    pub stream_hijacker: Option<StreamHijacker>,
    pub uni_stream_hijacker: Option<UniStreamHijacker>,
    pub debug: Option<DebugSink>,
    /// Overrides how QUIC connections are established.
    pub dialer: Option<Arc<dyn Dialer>>,
}

impl TransportOptions {
    /// Reject configurations that can never produce a valid connection.
    pub fn check(&self) -> Result<()> {
        settings::check_additional(&self.additional_settings).map_err(ClientError::Settings)
    }

    /// SETTINGS a connection built from these options advertises.
    pub fn settings(&self) -> Settings {
        Settings {
            max_field_section_size: self.max_response_header_bytes,
            enable_datagrams: self.enable_datagrams,
            additional: self.additional_settings.clone(),
        }
    }

    /// The configured dialer, or the quinn default.
    pub fn dialer(&self) -> Arc<dyn Dialer> {
        match &self.dialer {
            Some(dialer) => Arc::clone(dialer),
            None => Arc::new(QuinnDialer),
        }
    }

    /// The TLS configuration, or an error when none was supplied.
    pub fn tls_config(&self) -> Result<Arc<rustls::ClientConfig>> {
        self.tls
            .clone()
            .ok_or_else(|| ClientError::TlsConfig("no TLS client configuration".into()))
    }
}

impl fmt::Debug for TransportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportOptions")
            .field("tls", &self.tls.is_some())
            .field("quic", &self.quic.is_some())
            .field("enable_datagrams", &self.enable_datagrams)
            .field("additional_settings", &self.additional_settings)
            .field("max_response_header_bytes", &self.max_response_header_bytes)
            .field("disable_compression", &self.disable_compression)
            .field("stream_hijacker", &self.stream_hijacker.is_some())
            .field("uni_stream_hijacker", &self.uni_stream_hijacker.is_some())
            .field("debug", &self.debug.is_some())
            .field("dialer", &self.dialer.is_some())
            .finish()
    }
}

/// Per-request options for [`RoundTripper::round_trip_opt`].
///
/// [`RoundTripper::round_trip_opt`]: crate::RoundTripper::round_trip_opt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTripOpt {
    /// Fail with [`ClientError::NoCachedConn`] instead of creating a new
    /// connection.
    pub only_cached_conn: bool,
    /// Once response headers arrive, cancelling the caller no longer tears
    /// down the request stream. Forwarded to the connection untouched.
    pub dont_close_request_stream: bool,
}

impl RoundTripOpt {
    pub fn only_cached() -> Self {
        Self {
            only_cached_conn: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_pass_check() {
        assert!(TransportOptions::default().check().is_ok());
    }

    #[test]
    fn reserved_additional_setting_fails_check() {
        let options = TransportOptions {
            additional_settings: BTreeMap::from([(settings::H3_DATAGRAM, 1)]),
            ..Default::default()
        };
        assert!(matches!(
            options.check(),
            Err(ClientError::Settings(
                h3trip_proto::ProtoError::ReservedSetting(settings::H3_DATAGRAM)
            ))
        ));
    }

    #[test]
    fn settings_reflect_options() {
        let options = TransportOptions {
            enable_datagrams: true,
            max_response_header_bytes: Some(8192),
            additional_settings: BTreeMap::from([(0x21, 5)]),
            ..Default::default()
        };
        let settings = options.settings();
        assert!(settings.enable_datagrams);
        assert_eq!(settings.max_field_section_size, Some(8192));
        assert_eq!(settings.additional.get(&0x21), Some(&5));
    }

    #[test]
    fn missing_tls_is_reported() {
        let err = TransportOptions::default().tls_config().unwrap_err();
        assert!(matches!(err, ClientError::TlsConfig(_)));
    }

    #[test]
    fn only_cached_sets_flag() {
        let opt = RoundTripOpt::only_cached();
        assert!(opt.only_cached_conn);
        assert!(!opt.dont_close_request_stream);
    }
}
