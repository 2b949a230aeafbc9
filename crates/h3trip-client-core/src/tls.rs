//! TLS configuration for HTTP/3 client connections.
//!
//! HTTP/3 runs over QUIC, which requires TLS 1.3 and ALPN. The builder here
//! pins both and uses the ring crypto provider; certificate verification is
//! the standard webpki path against the supplied roots.

use std::sync::Arc;

use rustls_pki_types::CertificateDer;

use crate::error::{ClientError, Result};

/// ALPN protocol identifier for HTTP/3 (RFC 9114 Section 3.1).
pub const ALPN_H3: &[u8] = b"h3";

/// Build a `rustls::ClientConfig` for HTTP/3 against `roots`.
pub fn build_client_tls_config(roots: rustls::RootCertStore) -> Result<rustls::ClientConfig> {
    let mut config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_protocol_versions(&[&rustls::version::TLS13])
    .map_err(|e| ClientError::TlsConfig(format!("TLS version config: {e}")))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    config.alpn_protocols = vec![ALPN_H3.to_vec()];

    Ok(config)
}

/// Collect DER-encoded trust anchors into a root store.
pub fn root_store(
    certs: impl IntoIterator<Item = CertificateDer<'static>>,
) -> Result<rustls::RootCertStore> {
    let mut roots = rustls::RootCertStore::empty();
    for cert in certs {
        roots
            .add(cert)
            .map_err(|e| ClientError::TlsConfig(format!("root certificate: {e}")))?;
    }
    Ok(roots)
}
