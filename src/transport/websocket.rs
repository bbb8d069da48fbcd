use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_rustls::TlsAcceptor;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, ClientId};
use crate::relay::SharedRelay;
use crate::relay::message::SignalKind;
use crate::transport::message::ClientMessage;
use crate::utils::error::RelayError;

/// Binds the listening socket and serves connections until the process
/// exits. A port that cannot be bound is fatal.
pub async fn start_websocket_server(
    addr: String,
    relay: SharedRelay,
    tls: Option<TlsAcceptor>,
) -> Result<(), RelayError> {
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Bind {
            addr: addr.clone(),
            source: e,
        })?;

    let scheme = if tls.is_some() { "wss" } else { "ws" };
    info!("Signaling relay listening on {scheme}://{addr}");

    run_websocket_server(listener, relay, tls).await;
    Ok(())
}

/// Accept loop over an already-bound listener. Split out from
/// `start_websocket_server` so tests can bind to port 0 and learn the
/// address before the server starts serving.
pub async fn run_websocket_server(
    listener: TcpListener,
    relay: SharedRelay,
    tls: Option<TlsAcceptor>,
) {
    while let Ok((stream, peer_addr)) = listener.accept().await {
        let relay = relay.clone();
        let tls = tls.clone();

        tokio::spawn(async move {
            match tls {
                Some(acceptor) => match acceptor.accept(stream).await {
                    Ok(tls_stream) => handshake_and_serve(tls_stream, relay).await,
                    Err(e) => warn!("TLS handshake failed for {peer_addr}: {e}"),
                },
                None => handshake_and_serve(stream, relay).await,
            }
        });
    }
}

async fn handshake_and_serve<S>(stream: S, relay: SharedRelay)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };
    serve_connection(ws_stream, relay).await;
}

/// Runs one client connection: registers it (which greets it with its
/// identifier), pumps outbound frames from its channel, and dispatches
/// inbound frames until the transport closes. Cleanup runs exactly once no
/// matter which half of the connection dies first.
async fn serve_connection<S>(ws_stream: WebSocketStream<S>, relay: SharedRelay)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let client = Client::new(tx);
    let client_id = client.id.clone();
    {
        let mut relay = relay.lock().unwrap();
        relay.register_client(client);
    }

    let cleanup_called = Arc::new(AtomicBool::new(false));
    let do_cleanup = {
        let relay = relay.clone();
        let client_id = client_id.clone();
        let cleanup_called = cleanup_called.clone();

        move || {
            if !cleanup_called.swap(true, Ordering::SeqCst) {
                let mut relay = relay.lock().unwrap();
                relay.cleanup_client(&client_id);
            }
        }
    };

    // Forward frames from the relay to the socket. The relay itself never
    // awaits these writes.
    {
        let client_id = client_id.clone();
        let do_cleanup = do_cleanup.clone();

        spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    debug!("Failed to send frame to {client_id}: {e}");
                    break;
                }
            }
            do_cleanup();
            debug!("Send loop closed for {client_id}");
        });
    }

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            WsMessage::Text(text) => handle_frame(&relay, &client_id, &text),
            WsMessage::Binary(data) => {
                debug!(
                    "Dropping binary frame ({} bytes) from {client_id}",
                    data.len()
                );
            }
            // Ping/pong/close are the library's business.
            _ => {}
        }
    }

    debug!("{client_id} disconnected");
    do_cleanup();
}

/// Parses one text frame and dispatches it to the relay. Every per-message
/// failure mode ends here as a log line and a dropped frame; nothing is
/// reported back to the client.
pub(crate) fn handle_frame(relay: &SharedRelay, client_id: &ClientId, text: &str) {
    let frame = match serde_json::from_str::<ClientMessage>(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Dropping malformed frame from {client_id}: {e}");
            return;
        }
    };

    let mut relay = relay.lock().unwrap();
    match frame {
        ClientMessage::Subscribe { topic } => {
            if topic.is_empty() {
                debug!("Dropping subscribe with empty topic from {client_id}");
                return;
            }
            relay.subscribe(client_id, &topic);
            info!("{client_id} subscribed to {topic}");
        }
        ClientMessage::Unsubscribe { topic } => {
            if topic.is_empty() {
                debug!("Dropping unsubscribe with empty topic from {client_id}");
                return;
            }
            relay.unsubscribe(client_id, &topic);
            info!("{client_id} unsubscribed from {topic}");
        }
        ClientMessage::Publish { topic, data } => {
            if topic.is_empty() {
                debug!("Dropping publish with empty topic from {client_id}");
                return;
            }
            relay.publish(client_id, &topic, data);
        }
        ClientMessage::JoinVideoRoom { room_id } => {
            if room_id.is_empty() {
                debug!("Dropping join with empty room id from {client_id}");
                return;
            }
            relay.join_room(client_id, &room_id);
        }
        ClientMessage::LeaveVideoRoom { room_id } => {
            if room_id.is_empty() {
                debug!("Dropping leave with empty room id from {client_id}");
                return;
            }
            relay.leave_room(client_id, &room_id);
        }
        ClientMessage::VideoOffer { peer_id, data } => {
            relay.forward(client_id, &peer_id, SignalKind::Offer, data);
        }
        ClientMessage::VideoAnswer { peer_id, data } => {
            relay.forward(client_id, &peer_id, SignalKind::Answer, data);
        }
        ClientMessage::IceCandidate { peer_id, data } => {
            relay.forward(client_id, &peer_id, SignalKind::IceCandidate, data);
        }
    }
}
