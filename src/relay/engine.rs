use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, ClientId};
use crate::relay::message::{ServerMessage, SignalKind};
use crate::relay::room::Room;
use crate::relay::topic::Topic;

/// The relay behind one mutex. Every inbound frame takes the lock, mutates,
/// and releases before the next frame is handled, which is the only
/// atomicity the protocol needs.
pub type SharedRelay = Arc<Mutex<Relay>>;

/// Core state of the signaling relay.
///
/// Holds the client registry (identifier to connection handle), the topic
/// memberships used for CRDT gossip fan-out, and the room memberships used
/// for WebRTC presence. Delivery is fire-and-forget: frames are pushed onto
/// each client's unbounded channel and the relay never waits for the write
/// to complete or be acknowledged.
#[derive(Debug, Default)]
pub struct Relay {
    pub(crate) clients: HashMap<ClientId, Client>,
    pub(crate) topics: HashMap<String, Topic>,
    pub(crate) rooms: HashMap<String, Room>,
}

/// Serializes a frame and pushes it onto the client's channel. A closed
/// channel means the peer is already gone; the frame is dropped.
fn send_to(client: &Client, msg: &ServerMessage) {
    let text = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize frame: {e}");
            return;
        }
    };
    if let Err(e) = client.sender.send(WsMessage::text(text)) {
        debug!("Dropping frame for {}: {e}", client.id);
    }
}

impl Relay {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            topics: HashMap::new(),
            rooms: HashMap::new(),
        }
    }

    /// Registers a freshly accepted client and greets it with its assigned
    /// identifier. The greeting goes out before the client is inserted, so
    /// it is the first frame on the channel no matter what other traffic
    /// races in.
    pub fn register_client(&mut self, client: Client) {
        send_to(
            &client,
            &ServerMessage::Connection {
                client_id: client.id.clone(),
            },
        );
        info!("{} connected", client.id);
        self.clients.insert(client.id.clone(), client);
    }

    /// Resolves a peer identifier to its connection, if still online.
    pub fn lookup(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Subscribes a client to a topic, creating the topic if absent, and
    /// acks with the topic name. Subscribing twice is a no-op apart from the
    /// repeated ack.
    pub fn subscribe(&mut self, client_id: &ClientId, topic: &str) {
        let entry = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        entry.subscribe(client_id.clone());

        if let Some(client) = self.clients.get_mut(client_id) {
            client.topics.insert(topic.to_string());
            send_to(
                client,
                &ServerMessage::SubscribeAck {
                    topic: topic.to_string(),
                },
            );
        }
    }

    /// Removes a client from a topic. Unknown topic or membership is a
    /// silent no-op; no ack is sent.
    pub fn unsubscribe(&mut self, client_id: &ClientId, topic: &str) {
        if let Some(t) = self.topics.get_mut(topic) {
            t.unsubscribe(client_id);
        }
        if let Some(client) = self.clients.get_mut(client_id) {
            client.topics.remove(topic);
        }
    }

    /// Fans a gossip payload out to every subscriber of the topic except the
    /// publisher itself. Publishing does not require a prior subscribe, and
    /// publishing to a topic nobody has subscribed to delivers nothing — it
    /// does not create the topic or subscribe the publisher.
    pub fn publish(&self, sender_id: &ClientId, topic: &str, data: serde_json::Value) {
        let Some(t) = self.topics.get(topic) else {
            debug!("Publish from {sender_id} to unknown topic '{topic}' dropped");
            return;
        };
        let frame = ServerMessage::Publish {
            topic: topic.to_string(),
            data,
        };
        for sub_id in &t.subscribers {
            if sub_id == sender_id {
                continue;
            }
            if let Some(client) = self.clients.get(sub_id) {
                send_to(client, &frame);
            }
        }
    }

    /// Adds a client to a room and exchanges presence notifications: the
    /// joiner gets one `existing-peers` frame, each prior member gets one
    /// `new-peer` frame. The peer list is snapshotted before the joiner is
    /// inserted, so the joiner never sees itself.
    pub fn join_room(&mut self, client_id: &ClientId, room_id: &str) {
        let room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(room_id));
        let existing: Vec<ClientId> = room
            .members
            .iter()
            .filter(|id| *id != client_id && self.clients.contains_key(*id))
            .cloned()
            .collect();
        room.join(client_id.clone());

        if let Some(client) = self.clients.get_mut(client_id) {
            client.rooms.insert(room_id.to_string());
            send_to(
                client,
                &ServerMessage::ExistingPeers {
                    peer_ids: existing.clone(),
                },
            );
        }

        let announce = ServerMessage::NewPeer {
            peer_id: client_id.clone(),
        };
        for member_id in &existing {
            if let Some(member) = self.clients.get(member_id) {
                send_to(member, &announce);
            }
        }
        info!("{client_id} joined room {room_id}");
    }

    /// Removes a client from a room and tells the remaining members. Unknown
    /// room, or a client that was never a member, is a silent no-op — the
    /// membership check is what keeps a double leave from producing
    /// duplicate notifications.
    pub fn leave_room(&mut self, client_id: &ClientId, room_id: &str) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };
        if !room.leave(client_id) {
            return;
        }
        if let Some(client) = self.clients.get_mut(client_id) {
            client.rooms.remove(room_id);
        }

        let frame = ServerMessage::PeerLeft {
            peer_id: client_id.clone(),
        };
        for member_id in &room.members {
            if let Some(member) = self.clients.get(member_id) {
                send_to(member, &frame);
            }
        }
        info!("{client_id} left room {room_id}");
    }

    /// Relays a session-negotiation frame to one named peer, with `peerId`
    /// rewritten to the sender's identifier. If the target is unknown or its
    /// channel is closed, the frame vanishes; the sender is expected to time
    /// out and renegotiate at the application layer.
    pub fn forward(
        &self,
        from_id: &ClientId,
        to_peer_id: &str,
        kind: SignalKind,
        data: serde_json::Value,
    ) {
        let Some(target) = self.lookup(to_peer_id) else {
            debug!("Forward from {from_id} to unknown peer {to_peer_id} dropped");
            return;
        };
        send_to(target, &ServerMessage::signal(kind, from_id.clone(), data));
    }

    /// Sweeps every registry on disconnect: topic memberships, room
    /// memberships (with `peer-left` fan-out), and finally the identifier
    /// mapping. Safe to call more than once; the second call finds no
    /// registry entry and returns early, so no duplicate notifications go
    /// out.
    pub fn cleanup_client(&mut self, client_id: &ClientId) {
        let Some(client) = self.clients.remove(client_id) else {
            return;
        };

        for topic in &client.topics {
            if let Some(t) = self.topics.get_mut(topic) {
                t.unsubscribe(client_id);
            }
        }

        let frame = ServerMessage::PeerLeft {
            peer_id: client_id.clone(),
        };
        for room_id in &client.rooms {
            if let Some(room) = self.rooms.get_mut(room_id) {
                room.leave(client_id);
                for member_id in &room.members {
                    if let Some(member) = self.clients.get(member_id) {
                        send_to(member, &frame);
                    }
                }
            }
        }

        info!("Cleaned up {client_id}");
    }
}
