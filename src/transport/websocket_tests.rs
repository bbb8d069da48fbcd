use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tungstenite::protocol::Message as WsMessage;

use crate::relay::message::ServerMessage;
use crate::relay::{Relay, SharedRelay};
use crate::transport::websocket::run_websocket_server;

type ClientWs = WebSocketStream<TcpStream>;

/// Binds the relay to an ephemeral port over plain TCP (the TLS wrapper is
/// orthogonal to the protocol under test) and returns its address.
async fn start_test_server() -> (String, SharedRelay) {
    let relay = Arc::new(Mutex::new(Relay::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr").to_string();

    tokio::spawn(run_websocket_server(listener, relay.clone(), None));
    (addr, relay)
}

/// Connects a WebSocket client and consumes the connection greeting,
/// returning the stream and the relay-assigned identifier.
async fn connect_client(addr: &str) -> (ClientWs, String) {
    let stream = TcpStream::connect(addr).await.expect("Failed to connect");
    let (mut ws, _) = tokio_tungstenite::client_async(format!("ws://{addr}/"), stream)
        .await
        .expect("WebSocket handshake failed");

    match recv_frame(&mut ws).await {
        ServerMessage::Connection { client_id } => (ws, client_id),
        other => panic!("expected connection greeting, got {other:?}"),
    }
}

async fn recv_frame(ws: &mut ClientWs) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection closed")
        .expect("websocket error");
    match msg {
        WsMessage::Text(text) => serde_json::from_str(&text).expect("valid server frame"),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

async fn assert_silent(ws: &mut ClientWs) {
    let res = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(res.is_err(), "expected no frame, got {res:?}");
}

async fn send_json(ws: &mut ClientWs, value: serde_json::Value) {
    ws.send(WsMessage::text(value.to_string()))
        .await
        .expect("Failed to send frame");
}

#[tokio::test]
async fn test_greeting_arrives_before_anything_else() {
    let (addr, relay) = start_test_server().await;
    let (_ws, client_id) = connect_client(&addr).await;

    assert!(client_id.starts_with("client-"));
    assert!(relay.lock().unwrap().lookup(&client_id).is_some());
}

#[tokio::test]
async fn test_publish_fans_out_to_subscriber_but_not_publisher() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, _a_id) = connect_client(&addr).await;
    let (mut ws_b, _b_id) = connect_client(&addr).await;

    send_json(&mut ws_a, json!({"type": "subscribe", "topic": "room-42"})).await;
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::SubscribeAck {
            topic: "room-42".to_string()
        }
    );

    send_json(
        &mut ws_b,
        json!({"type": "publish", "topic": "room-42", "data": {"foo": 1}}),
    )
    .await;

    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::Publish {
            topic: "room-42".to_string(),
            data: json!({"foo": 1}),
        }
    );
    assert_silent(&mut ws_b).await;
}

#[tokio::test]
async fn test_room_join_exchanges_presence_frames() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, a_id) = connect_client(&addr).await;
    let (mut ws_b, b_id) = connect_client(&addr).await;

    send_json(&mut ws_a, json!({"type": "join-video-room", "roomId": "video-1"})).await;
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::ExistingPeers { peer_ids: vec![] }
    );

    send_json(&mut ws_b, json!({"type": "join-video-room", "roomId": "video-1"})).await;
    assert_eq!(
        recv_frame(&mut ws_b).await,
        ServerMessage::ExistingPeers {
            peer_ids: vec![a_id]
        }
    );
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::NewPeer { peer_id: b_id }
    );
}

#[tokio::test]
async fn test_offer_is_forwarded_with_sender_identity() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, a_id) = connect_client(&addr).await;
    let (mut ws_b, b_id) = connect_client(&addr).await;

    send_json(
        &mut ws_a,
        json!({"type": "video-offer", "peerId": b_id, "data": {"sdp": "v=0..."}}),
    )
    .await;

    assert_eq!(
        recv_frame(&mut ws_b).await,
        ServerMessage::VideoOffer {
            peer_id: a_id,
            data: json!({"sdp": "v=0..."}),
        }
    );
}

#[tokio::test]
async fn test_offer_to_offline_peer_is_silently_dropped() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, _a_id) = connect_client(&addr).await;

    send_json(
        &mut ws_a,
        json!({"type": "video-offer", "peerId": "client-gone", "data": {"sdp": "..."}}),
    )
    .await;

    assert_silent(&mut ws_a).await;
}

#[tokio::test]
async fn test_disconnect_notifies_room_members() {
    let (addr, relay) = start_test_server().await;
    let (mut ws_a, _a_id) = connect_client(&addr).await;
    let (mut ws_b, b_id) = connect_client(&addr).await;

    send_json(&mut ws_a, json!({"type": "join-video-room", "roomId": "video-1"})).await;
    recv_frame(&mut ws_a).await; // existing-peers
    send_json(&mut ws_b, json!({"type": "join-video-room", "roomId": "video-1"})).await;
    recv_frame(&mut ws_b).await; // existing-peers
    recv_frame(&mut ws_a).await; // new-peer

    ws_b.close(None).await.expect("Failed to close");

    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::PeerLeft {
            peer_id: b_id.clone()
        }
    );

    // The close handler must have swept every registry synchronously before
    // the peer-left frame went out.
    let relay = relay.lock().unwrap();
    assert!(relay.lookup(&b_id).is_none());
    assert!(!relay.rooms["video-1"].members.contains(&b_id));
}

#[tokio::test]
async fn test_binary_frames_are_dropped_without_closing_the_connection() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, _a_id) = connect_client(&addr).await;

    ws_a.send(WsMessage::binary(vec![0x01, 0x02, 0x03]))
        .await
        .expect("Failed to send frame");
    assert_silent(&mut ws_a).await;

    // Still alive and serving.
    send_json(&mut ws_a, json!({"type": "subscribe", "topic": "room-42"})).await;
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::SubscribeAck {
            topic: "room-42".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_frames_do_not_close_the_connection() {
    let (addr, _relay) = start_test_server().await;
    let (mut ws_a, _a_id) = connect_client(&addr).await;

    send_json(&mut ws_a, json!({"type": "teleport"})).await;
    ws_a.send(WsMessage::text("not json at all"))
        .await
        .expect("Failed to send frame");

    // Still alive and serving.
    send_json(&mut ws_a, json!({"type": "subscribe", "topic": "room-42"})).await;
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerMessage::SubscribeAck {
            topic: "room-42".to_string()
        }
    );
}
