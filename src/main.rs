use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing::info;
use vizrelay::config::load_config;
use vizrelay::relay::Relay;
use vizrelay::transport::tls::build_tls_acceptor;
use vizrelay::transport::websocket::start_websocket_server;
use vizrelay::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // rustls needs an explicit provider selection.
    let _ = tokio_rustls::rustls::crypto::ring::default_provider().install_default();

    let config = load_config().context("Failed to load configuration")?;
    logging::init(&config.log.level);

    let tls = build_tls_acceptor(&config.tls.cert, &config.tls.key)
        .context("Failed to set up TLS")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let relay = Arc::new(Mutex::new(Relay::new()));

    tokio::select! {
        res = start_websocket_server(addr, relay, Some(tls)) => {
            res.context("Signaling server exited unexpectedly")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }

    Ok(())
}
