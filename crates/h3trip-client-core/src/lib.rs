//! h3trip client-side transport core.
//!
//! Presents a single "send request, get response" entry point over HTTP/3
//! while managing one multiplexed QUIC connection per remote authority:
//!
//! - Pre-flight request validation (see `h3trip-proto`)
//! - Authority-keyed connection cache with lazy creation
//! - One shared, sticky dial per connection
//! - Pre-warming and bulk shutdown
//! - Default quinn dialer and TLS 1.3 / `h3` ALPN configuration
//!
//! The HTTP/3 framing engine for each connection is supplied by the caller
//! through [`ConnectionFactory`].

pub mod cache;
pub mod connection;
pub mod dial;
pub mod endpoint;
pub mod error;
pub mod options;
pub mod round_tripper;
pub mod tls;

pub use cache::ConnectionCache;
pub use connection::{Connection, ConnectionFactory, ConnectionHandle};
pub use dial::DialStatus;
pub use endpoint::{Dialer, QuinnDialer};
pub use error::ClientError;
pub use options::{RoundTripOpt, TransportOptions};
pub use round_tripper::RoundTripper;
pub use tls::{build_client_tls_config, root_store};

pub use h3trip_proto::{Authority, Body, Request, Response};
