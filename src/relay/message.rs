use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames the relay sends to clients.
///
/// Every frame is one JSON object tagged on `type`. The field casing matches
/// what browser peers expect (`clientId`, `peerId`, `peerIds`), so the serde
/// renames here are part of the wire contract, not style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent exactly once, immediately after accept, before any inbound frame
    /// for the connection is processed.
    #[serde(rename = "connection")]
    Connection {
        #[serde(rename = "clientId")]
        client_id: String,
    },

    /// Acknowledges a subscribe, echoing the topic name back.
    #[serde(rename = "subscribe-ack")]
    SubscribeAck { topic: String },

    /// Gossip fan-out to every other subscriber of a topic.
    #[serde(rename = "publish")]
    Publish { topic: String, data: Value },

    /// Tells existing room members that a peer has joined.
    #[serde(rename = "new-peer")]
    NewPeer {
        #[serde(rename = "peerId")]
        peer_id: String,
    },

    /// Tells a joining peer which members were already in the room.
    #[serde(rename = "existing-peers")]
    ExistingPeers {
        #[serde(rename = "peerIds")]
        peer_ids: Vec<String>,
    },

    /// Tells remaining room members that a peer left or disconnected.
    #[serde(rename = "peer-left")]
    PeerLeft {
        #[serde(rename = "peerId")]
        peer_id: String,
    },

    /// Forwarded session description, `peerId` rewritten to the sender.
    #[serde(rename = "video-offer")]
    VideoOffer {
        #[serde(rename = "peerId")]
        peer_id: String,
        data: Value,
    },

    #[serde(rename = "video-answer")]
    VideoAnswer {
        #[serde(rename = "peerId")]
        peer_id: String,
        data: Value,
    },

    #[serde(rename = "ice-candidate")]
    IceCandidate {
        #[serde(rename = "peerId")]
        peer_id: String,
        data: Value,
    },
}

/// Which point-to-point negotiation frame is being forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl ServerMessage {
    /// Builds the outbound frame for a forwarded negotiation message. The
    /// payload travels unchanged; only `peer_id` is swapped for the sender's
    /// identifier so the recipient knows who is calling.
    pub fn signal(kind: SignalKind, peer_id: String, data: Value) -> Self {
        match kind {
            SignalKind::Offer => ServerMessage::VideoOffer { peer_id, data },
            SignalKind::Answer => ServerMessage::VideoAnswer { peer_id, data },
            SignalKind::IceCandidate => ServerMessage::IceCandidate { peer_id, data },
        }
    }
}
