use std::sync::Arc;

use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls;

use crate::utils::error::RelayError;

/// Builds a TLS acceptor from PEM-encoded certificate chain and private key
/// files. Any failure here is fatal at startup; the relay has no
/// partial-degradation mode.
pub fn build_tls_acceptor(cert_path: &str, key_path: &str) -> Result<TlsAcceptor, RelayError> {
    let cert_pem = std::fs::read(cert_path).map_err(|e| RelayError::CertRead {
        path: cert_path.to_string(),
        source: e,
    })?;
    let key_pem = std::fs::read(key_path).map_err(|e| RelayError::CertRead {
        path: key_path.to_string(),
        source: e,
    })?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut &cert_pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RelayError::CertParse {
            path: cert_path.to_string(),
            source: e,
        })?;
    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|e| RelayError::CertParse {
            path: key_path.to_string(),
            source: e,
        })?
        .ok_or_else(|| RelayError::NoPrivateKey {
            path: key_path.to_string(),
        })?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}
