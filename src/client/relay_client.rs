use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

/// Opaque identifier assigned by the relay to a connection. Clients never
/// choose their own; peers address each other with these.
pub type ClientId = String;

/// Represents a connected WebSocket client.
///
/// Each client is identified by a randomly generated `id` and owns a channel
/// (`sender`) for pushing outbound frames to its connection's write loop.
/// The `topics` and `rooms` sets mirror the memberships held on the relay
/// side so that disconnect cleanup never has to scan every topic or room.
#[derive(Debug)]
pub struct Client {
    /// Relay-assigned identifier, unpredictable enough that collisions are
    /// not defended against.
    pub id: ClientId,

    /// Channel to send WebSocket frames to the client.
    pub sender: UnboundedSender<WsMessage>,

    /// Names of the topics this client is currently subscribed to.
    pub topics: HashSet<String>,

    /// Identifiers of the video rooms this client has joined.
    pub rooms: HashSet<String>,
}

impl Client {
    /// Creates a client with a freshly generated identifier and empty
    /// membership indexes.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("client-{}", uuid::Uuid::new_v4()),
            sender,
            topics: HashSet::new(),
            rooms: HashSet::new(),
        }
    }
}
