use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames clients send to the relay, tagged on `type`.
///
/// A frame missing a required field fails deserialization and is treated the
/// same as non-JSON input: logged and dropped. Unknown extra fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { topic: String },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String },

    #[serde(rename = "publish")]
    Publish { topic: String, data: Value },

    #[serde(rename = "join-video-room")]
    JoinVideoRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    #[serde(rename = "leave-video-room")]
    LeaveVideoRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },

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
