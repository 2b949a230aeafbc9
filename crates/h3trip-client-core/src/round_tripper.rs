//! Public round-trip entry points and connection lifecycle.

use std::sync::Arc;
use std::time::Duration;

use h3trip_proto::validate::validate;
use h3trip_proto::{Authority, Request, Response};
use tracing::{debug, info};

use crate::cache::ConnectionCache;
use crate::connection::ConnectionFactory;
use crate::error::{ClientError, Result};
use crate::options::{RoundTripOpt, TransportOptions};

/// Upper bound on the dial started by [`RoundTripper::warm`].
pub const WARM_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP/3 round tripper keeping one connection per authority.
///
/// # Example
///
/// ```rust,ignore
/// let tls = build_client_tls_config(roots)?;
/// let options = TransportOptions { tls: Some(Arc::new(tls)), ..Default::default() };
/// let rt = RoundTripper::new(options, MyH3Factory)?;
///
/// rt.warm("example.test:443").await?;
/// let resp = rt.round_trip(Request::get("https://example.test/".parse()?)).await?;
/// assert_eq!(resp.status(), 200);
/// rt.close().await?;
/// ```
pub struct RoundTripper {
    options: Arc<TransportOptions>,
    cache: ConnectionCache,
}

impl RoundTripper {
    /// Freeze `options` and build an empty round tripper.
    ///
    /// Fails if the additional SETTINGS collide with reserved identifiers.
    pub fn new(options: TransportOptions, factory: impl ConnectionFactory + 'static) -> Result<Self> {
        Self::with_factory(options, Arc::new(factory))
    }

    /// Like [`RoundTripper::new`] with an already shared factory.
    pub fn with_factory(
        options: TransportOptions,
        factory: Arc<dyn ConnectionFactory>,
    ) -> Result<Self> {
        options.check()?;
        let options = Arc::new(options);
        Ok(Self {
            cache: ConnectionCache::new(factory, Arc::clone(&options)),
            options,
        })
    }

    /// The configuration snapshot shared with every connection.
    pub fn options(&self) -> &Arc<TransportOptions> {
        &self.options
    }

    /// Round trip with default options.
    pub async fn round_trip(&self, req: Request) -> Result<Response> {
        self.round_trip_opt(req, RoundTripOpt::default()).await
    }

    /// Round trip over an existing connection only; never dials.
    pub async fn round_trip_only_cached_conn(&self, req: Request) -> Result<Response> {
        self.round_trip_opt(req, RoundTripOpt::only_cached()).await
    }

    /// Validate `req`, find or create the connection for its authority and
    /// forward the request to it.
    ///
    /// Malformed requests are rejected with their body released before any
    /// connection is looked up. Errors from the connection are returned
    /// unchanged.
    pub async fn round_trip_opt(&self, req: Request, opt: RoundTripOpt) -> Result<Response> {
        let req = validate(req)?;

        let authority = Authority::for_request(&req);
        let handle = self.cache.get_or_create(&authority, !opt.only_cached_conn);

        if !matches!(handle, Err(ClientError::NoCachedConn)) {
            self.trace_dispatch(&req);
        }

        handle?.round_trip(req, opt).await
    }

    /// Dial the connection for `authority` now rather than on first use.
    ///
    /// Concurrent and repeated calls share one dial. A failed dial is
    /// remembered: later calls return the same error until [`close`].
    ///
    /// [`close`]: RoundTripper::close
    pub async fn warm(&self, authority: &str) -> Result<()> {
        let authority = Authority::parse(authority)?;
        let handle = self.cache.get_or_create(&authority, true)?;
        handle.ensure_dialed(Some(WARM_DIAL_TIMEOUT)).await?;
        info!(%authority, "connection warm");
        Ok(())
    }

    /// Close every cached connection and reset the cache.
    ///
    /// The round tripper stays usable; later requests dial fresh
    /// connections.
    pub async fn close(&self) -> Result<()> {
        debug!(cached = self.cache.len(), "closing all connections");
        self.cache.close_all().await
    }

    /// Authorities with a cached connection, sorted.
    pub fn cached_authorities(&self) -> Vec<Authority> {
        self.cache.authorities()
    }

    fn trace_dispatch(&self, req: &Request) {
        let method = req.effective_method();
        let uri = req.uri.as_ref().map(ToString::to_string).unwrap_or_default();
        debug!(%method, %uri, "HTTP/3 request");
        if let Some(sink) = &self.options.debug {
            sink(&format!("HTTP/3 {method} {uri}"));
        }
    }
}
