//! Error types for unrecoverable startup conditions.
//!
//! Per-message problems (malformed frames, unknown peers, stale channels)
//! are never errors in this crate; they are logged and dropped where they
//! occur. `RelayError` covers only the failures that stop the process from
//! serving at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to read {path}")]
    CertRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PEM material in {path}")]
    CertParse {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no private key found in {path}")]
    NoPrivateKey { path: String },

    #[error("invalid TLS configuration")]
    Tls(#[from] tokio_rustls::rustls::Error),

    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
