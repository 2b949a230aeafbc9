//! Per-connection collaborator contract and the cached handle around it.
//!
//! A [`Connection`] is the HTTP/3 engine for one authority: it owns the QUIC
//! connection, the control streams and request framing. The round tripper
//! only needs the three operations below, so engines can be swapped or
//! mocked freely.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use h3trip_proto::{Authority, Request, Response};
use tracing::{info, warn};

use crate::dial::{DialGate, DialStatus};
use crate::error::Result;
use crate::options::{RoundTripOpt, TransportOptions};

/// HTTP/3 client for a single authority.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Establish the QUIC connection and HTTP/3 control streams.
    ///
    /// Called at most once per connection, before the first round trip.
    async fn dial(&self) -> Result<()>;

    /// Send `req` and wait for the response headers and body.
    async fn round_trip(&self, req: Request, opt: RoundTripOpt) -> Result<Response>;

    /// Close the connection and everything running on it.
    async fn close(&self) -> Result<()>;
}

/// Creates connections for authorities the cache has not seen.
///
/// Construction should not touch the network; dialing happens later
/// through [`Connection::dial`].
pub trait ConnectionFactory: Send + Sync {
    fn new_connection(
        &self,
        authority: &Authority,
        options: &Arc<TransportOptions>,
    ) -> Result<Arc<dyn Connection>>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&Authority, &Arc<TransportOptions>) -> Result<Arc<dyn Connection>> + Send + Sync,
{
    fn new_connection(
        &self,
        authority: &Authority,
        options: &Arc<TransportOptions>,
    ) -> Result<Arc<dyn Connection>> {
        self(authority, options)
    }
}

/// A cached connection plus the gate that dials it exactly once.
pub struct ConnectionHandle {
    authority: Authority,
    conn: Arc<dyn Connection>,
    gate: DialGate,
}

impl ConnectionHandle {
    pub(crate) fn new(authority: Authority, conn: Arc<dyn Connection>) -> Self {
        Self {
            authority,
            conn,
            gate: DialGate::new(),
        }
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn dial_status(&self) -> DialStatus {
        self.gate.status()
    }

    /// Dial if nobody has yet, otherwise wait for (or return) the shared
    /// outcome.
    pub async fn ensure_dialed(&self, timeout: Option<Duration>) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let authority = self.authority.clone();
        let dial = async move {
            let outcome = conn.dial().await;
            match &outcome {
                Ok(()) => info!(%authority, "connection dialed"),
                Err(e) => warn!(%authority, error = %e, "dial failed"),
            }
            outcome
        };
        self.gate.ensure(dial, timeout).await
    }

    /// Dial on first use, then forward the request to the connection.
    pub async fn round_trip(&self, req: Request, opt: RoundTripOpt) -> Result<Response> {
        self.ensure_dialed(None).await?;
        self.conn.round_trip(req, opt).await
    }

    pub async fn close(&self) -> Result<()> {
        self.conn.close().await
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("authority", &self.authority)
            .field("dial_status", &self.gate.status())
            .finish()
    }
}
