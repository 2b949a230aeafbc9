//! QUIC connection establishment.
//!
//! [`Dialer`] is the seam through which per-connection engines obtain their
//! QUIC connection. [`QuinnDialer`] is the default: it resolves the
//! authority, binds a fresh client endpoint and completes the QUIC/TLS
//! handshake.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use h3trip_proto::Authority;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::tls::ALPN_H3;

/// Establishes QUIC connections for a given authority.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(
        &self,
        authority: &Authority,
        tls: Arc<rustls::ClientConfig>,
        transport: Option<Arc<quinn::TransportConfig>>,
    ) -> Result<quinn::Connection>;
}

/// Default dialer backed by quinn.
///
/// Each dial binds its own client endpoint on an ephemeral port of the
/// resolved address family; the endpoint lives as long as the connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuinnDialer;

#[async_trait]
impl Dialer for QuinnDialer {
    async fn dial(
        &self,
        authority: &Authority,
        tls: Arc<rustls::ClientConfig>,
        transport: Option<Arc<quinn::TransportConfig>>,
    ) -> Result<quinn::Connection> {
        let remote = resolve(authority).await?;

        let client_config = client_config(tls, transport)?;

        let bind_addr = if remote.is_ipv6() {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        };
        let endpoint =
            quinn::Endpoint::client(bind_addr).map_err(|e| ClientError::Endpoint(e.to_string()))?;

        debug!(%authority, %remote, "dialing");
        let connecting = endpoint.connect_with(client_config, remote, authority.host())?;
        let conn = connecting.await?;

        info!(%authority, %remote, "QUIC connection established");
        Ok(conn)
    }
}

/// Resolve an authority to the first socket address the system returns.
pub async fn resolve(authority: &Authority) -> Result<SocketAddr> {
    let target = authority.to_string();
    let mut addrs = tokio::net::lookup_host(target.as_str())
        .await
        .map_err(|e| ClientError::Resolve {
            authority: authority.clone(),
            reason: e.to_string(),
        })?;
    addrs.next().ok_or_else(|| ClientError::Resolve {
        authority: authority.clone(),
        reason: "no addresses".into(),
    })
}

/// Build the quinn client config, defaulting ALPN to `h3`.
fn client_config(
    tls: Arc<rustls::ClientConfig>,
    transport: Option<Arc<quinn::TransportConfig>>,
) -> Result<quinn::ClientConfig> {
    let tls = if tls.alpn_protocols.is_empty() {
        let mut with_alpn = (*tls).clone();
        with_alpn.alpn_protocols = vec![ALPN_H3.to_vec()];
        Arc::new(with_alpn)
    } else {
        tls
    };

    let quic_client_config = quinn::crypto::rustls::QuicClientConfig::try_from(tls)
        .map_err(|e| ClientError::TlsConfig(format!("rustls→quinn: {e}")))?;

    let mut client_config = quinn::ClientConfig::new(Arc::new(quic_client_config));
    if let Some(transport) = transport {
        client_config.transport_config(transport);
    }
    Ok(client_config)
}
